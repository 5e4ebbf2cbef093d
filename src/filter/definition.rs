use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Leaf value carried by a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Representation used in url-encoded query parameters.
    /// Booleans follow the `1`/`0` convention of the remote API.
    pub fn to_query_value(&self) -> String {
        match self {
            ScalarValue::Bool(true) => "1".to_string(),
            ScalarValue::Bool(false) => "0".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Integer(value.into())
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::Integer(value.into())
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

/// Operator/operand pair of a complex filter, e.g. `{key: "gt", value: 123}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub value: ScalarValue,
}

impl Condition {
    pub fn new(key: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Condition {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Value side of a filter definition. Nesting is limited to one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(ScalarValue),
    Nested(Condition),
}

impl From<ScalarValue> for FilterValue {
    fn from(value: ScalarValue) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<Condition> for FilterValue {
    fn from(value: Condition) -> Self {
        FilterValue::Nested(value)
    }
}

/// A single `{key, value}` filter as sent to the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub key: String,
    pub value: FilterValue,
}

impl FilterDefinition {
    /// Flat definition: `{key, value}`
    pub fn new(key: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        FilterDefinition {
            key: key.into(),
            value: FilterValue::Scalar(value.into()),
        }
    }

    /// Operator definition: `{key, value: {key: operator, value: operand}}`
    pub fn nested(
        key: impl Into<String>,
        operator: impl Into<String>,
        operand: impl Into<ScalarValue>,
    ) -> Self {
        FilterDefinition {
            key: key.into(),
            value: FilterValue::Nested(Condition::new(operator, operand)),
        }
    }

    pub fn condition(&self) -> Option<&Condition> {
        match &self.value {
            FilterValue::Nested(condition) => Some(condition),
            FilterValue::Scalar(_) => None,
        }
    }
}

impl TryFrom<&Value> for FilterDefinition {
    type Error = AppError;

    /// Strict conversion from an untyped JSON definition.
    fn try_from(value: &Value) -> AppResult<Self> {
        let (key, inner) = split_pair(value)?;
        let value = match inner {
            Value::Object(_) => {
                let (operator, operand) = split_pair(inner)?;
                FilterValue::Nested(Condition {
                    key: operator,
                    value: scalar_from_value(operand)?,
                })
            }
            other => FilterValue::Scalar(scalar_from_value(other)?),
        };

        Ok(FilterDefinition { key, value })
    }
}

fn split_pair(value: &Value) -> AppResult<(String, &Value)> {
    let object = value.as_object().ok_or_else(|| {
        AppError::Validation(format!("Filter definition must be an object, got {}", value))
    })?;

    let key = object
        .get("key")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Validation("Filter definition requires a string 'key'".into()))?;

    let inner = object
        .get("value")
        .ok_or_else(|| AppError::Validation(format!("Filter definition '{}' has no 'value'", key)))?;

    Ok((key.to_string(), inner))
}

fn scalar_from_value(value: &Value) -> AppResult<ScalarValue> {
    match value {
        Value::String(s) => Ok(ScalarValue::String(s.clone())),
        Value::Bool(b) => Ok(ScalarValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ScalarValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(ScalarValue::Float(f))
            } else {
                Err(AppError::Validation(format!("Unsupported numeric filter value: {}", n)))
            }
        }
        other => Err(AppError::Validation(format!(
            "Filter value must be a scalar, got {}",
            other
        ))),
    }
}
