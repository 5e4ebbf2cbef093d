use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Serialization(serde_json::Error),
    Yaml(serde_yaml::Error),
    Configuration(String),
    DateFormat(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "Validation error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
            AppError::Yaml(e) => write!(f, "YAML error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::DateFormat(e) => write!(f, "Date format error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Serialization(e) => Some(e),
            AppError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err)
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Yaml(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            AppError::Validation("missing key".into()).to_string(),
            "Validation error: missing key"
        );
        assert_eq!(
            AppError::DateFormat("bad".into()).to_string(),
            "Date format error: bad"
        );
    }

    #[test]
    fn test_source_is_kept_for_wrapped_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AppError = json_err.into();
        assert!(err.source().is_some());
        assert!(AppError::Configuration("x".into()).source().is_none());
    }
}
