use crate::error::{AppError, AppResult};
use crate::filter::{
    BatchFilterBag, Condition, ScalarValue, DEFAULT_DATE_FORMAT, DEFAULT_ID_FIELD_NAME,
};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

lazy_static! {
    /// `${VAR}` or `${VAR:-default}`
    static ref ENV_VAR_PATTERN: Regex = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").unwrap();
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilterBagConfig {
    /// Id column used by the last id filter
    #[serde(default = "default_id_field_name")]
    pub id_field_name: String,
    /// Pattern for date filters
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Column compared by the `--since` date filter
    #[serde(default = "default_date_field")]
    pub date_field: String,
    #[serde(default)]
    pub website_ids: Vec<u32>,
    #[serde(default)]
    pub store_ids: Vec<u32>,
    /// Simple filter seeds, `name: value`
    #[serde(default)]
    pub filters: IndexMap<String, ScalarValue>,
    /// Complex filter seeds, `name: {key: operator, value: operand}`
    #[serde(default)]
    pub complex_filters: IndexMap<String, Condition>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

fn default_id_field_name() -> String {
    DEFAULT_ID_FIELD_NAME.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_date_field() -> String {
    "updated_at".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FilterBagConfig {
    fn default() -> Self {
        FilterBagConfig {
            id_field_name: default_id_field_name(),
            date_format: default_date_format(),
            date_field: default_date_field(),
            website_ids: Vec::new(),
            store_ids: Vec::new(),
            filters: IndexMap::new(),
            complex_filters: IndexMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FilterBagConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML, expanding environment variables first
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let expanded = Self::expand_env_vars(content)?;
        let config: FilterBagConfig = serde_yaml::from_str(&expanded)?;

        if config.id_field_name.trim().is_empty() {
            return Err(AppError::Configuration(
                "id_field_name must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Expand environment variables in format ${VAR_NAME} or ${VAR_NAME:-default}
    fn expand_env_vars(content: &str) -> AppResult<String> {
        let mut expanded = String::with_capacity(content.len());
        let mut last = 0;

        for captures in ENV_VAR_PATTERN.captures_iter(content) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            let value = match std::env::var(name.as_str()) {
                Ok(value) => value,
                Err(_) => match captures.get(2) {
                    Some(default) => default.as_str().to_string(),
                    None => {
                        return Err(AppError::Configuration(format!(
                            "Environment variable {} not found and no default provided",
                            name.as_str()
                        )))
                    }
                },
            };

            expanded.push_str(&content[last..whole.start()]);
            expanded.push_str(&value);
            last = whole.end();
        }

        expanded.push_str(&content[last..]);
        Ok(expanded)
    }

    /// Build a bag seeded with the configured filters
    pub fn build_bag(&self) -> BatchFilterBag {
        let mut bag = BatchFilterBag::with_filters(
            self.filters.clone(),
            self.complex_filters.clone(),
        );

        if !self.website_ids.is_empty() {
            bag.add_website_filter(self.website_ids.as_slice());
        }
        if !self.store_ids.is_empty() {
            bag.add_store_filter(self.store_ids.as_slice());
        }

        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterDefinition, FilterKind};

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("FILTER_BAG_TEST_STATUS", "complete");

        let yaml_content = "status: ${FILTER_BAG_TEST_STATUS:-pending}\nfield: ${FILTER_BAG_TEST_MISSING:-entity_id}";
        let expanded = FilterBagConfig::expand_env_vars(yaml_content).unwrap();
        assert_eq!(expanded, "status: complete\nfield: entity_id");

        std::env::remove_var("FILTER_BAG_TEST_STATUS");
    }

    #[test]
    fn test_env_var_without_default_fails() {
        let result = FilterBagConfig::expand_env_vars("x: ${FILTER_BAG_TEST_NOT_SET_ANYWHERE}");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_defaults() {
        let config = FilterBagConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, FilterBagConfig::default());
        assert_eq!(config.id_field_name, "entity_id");
        assert_eq!(config.date_format, "Y-m-d H:i:s");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_id_field_is_rejected() {
        let result = FilterBagConfig::from_yaml_str("id_field_name: ''");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_build_bag() {
        let config = FilterBagConfig::from_yaml_str(
            r#"
website_ids: [1, 2]
store_ids: [3]
filters:
  status: pending
complex_filters:
  created_at:
    key: gteq
    value: "2024-01-01 00:00:00"
"#,
        )
        .unwrap();

        let bag = config.build_bag();
        assert_eq!(
            bag.get(FilterKind::Simple, "status"),
            Some(&FilterDefinition::new("status", "pending"))
        );
        assert_eq!(
            bag.get(FilterKind::Complex, "created_at"),
            Some(&FilterDefinition::nested("created_at", "gteq", "2024-01-01 00:00:00"))
        );
        assert_eq!(
            bag.get(FilterKind::Complex, "website_id"),
            Some(&FilterDefinition::nested("website_id", "in", "1,2"))
        );
        assert_eq!(
            bag.get(FilterKind::Complex, "store_id"),
            Some(&FilterDefinition::nested("store_id", "in", "3"))
        );
    }
}
