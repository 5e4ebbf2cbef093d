use crate::error::{AppError, AppResult};
use std::str::FromStr;
use tracing::Level;

pub fn parse_level(level: &str) -> AppResult<Level> {
    Level::from_str(level.trim())
        .map_err(|_| AppError::Configuration(format!("Unknown log level: {}", level)))
}

/// Install the global fmt subscriber. Output goes to stderr so stdout stays
/// reserved for the rendered filters.
pub fn init(level: &str) -> AppResult<()> {
    let level = parse_level(level)?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Configuration(format!("Failed to initialise logging: {}", e)))
}
