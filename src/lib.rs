pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod query;

// Re-export commonly used types for easier access
pub use error::{AppError, AppResult};
pub use filter::{AppliedFilters, BatchFilterBag, FilterDefinition, FilterKind};
