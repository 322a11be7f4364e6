//! Typed decoding of KV v2 secret fields.
//!
//! Secret data arrives as an untyped JSON object. Fields are pulled out
//! through these helpers so a wrong or missing value produces a
//! [`DecodeError`] that still says what was actually there.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// JSON kind of a field value, with `Absent` for a missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    /// Field not present
    Absent,
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Any JSON number
    Number,
    /// A JSON string
    String,
    /// A JSON array
    Array,
    /// A JSON object
    Object,
}

impl JsonKind {
    /// Classify a possibly missing value.
    #[must_use]
    pub const fn of(value: Option<&Value>) -> Self {
        match value {
            None => Self::Absent,
            Some(Value::Null) => Self::Null,
            Some(Value::Bool(_)) => Self::Bool,
            Some(Value::Number(_)) => Self::Number,
            Some(Value::String(_)) => Self::String,
            Some(Value::Array(_)) => Self::Array,
            Some(Value::Object(_)) => Self::Object,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field could not be decoded into the requested type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field {field:?}: expected {expected}, found {actual} {actual_value}")]
pub struct DecodeError {
    /// Field name
    pub field: String,
    /// Name of the requested type
    pub expected: String,
    /// Kind of the value found
    pub actual: JsonKind,
    /// Rendered value found (`<absent>` when missing)
    pub actual_value: String,
}

impl DecodeError {
    fn new(field: &str, expected: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            field: field.to_string(),
            expected: expected.into(),
            actual: JsonKind::of(value),
            actual_value: value.map_or_else(|| "<absent>".to_string(), Value::to_string),
        }
    }
}

/// Extract a string field.
///
/// # Errors
///
/// Returns [`DecodeError`] when the field is missing or holds anything other
/// than a JSON string.
pub fn string_field(data: &Map<String, Value>, field: &str) -> Result<String, DecodeError> {
    match data.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(DecodeError::new(field, "string", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_string_field_ok() {
        let d = data(json!({"password": "Hashi123"}));
        assert_eq!(string_field(&d, "password").unwrap(), "Hashi123");
    }

    #[test]
    fn test_string_field_number() {
        let d = data(json!({"password": 12345}));
        let err = string_field(&d, "password").unwrap_err();
        assert_eq!(err.actual, JsonKind::Number);
        assert_eq!(err.actual_value, "12345");
        assert_eq!(err.expected, "string");
    }

    #[test]
    fn test_string_field_absent() {
        let d = data(json!({"username": "admin"}));
        let err = string_field(&d, "password").unwrap_err();
        assert_eq!(err.actual, JsonKind::Absent);
        assert_eq!(err.actual_value, "<absent>");
    }

    #[test]
    fn test_string_field_null_and_nested() {
        let d = data(json!({"a": null, "b": {"x": 1}, "c": [true]}));
        assert_eq!(string_field(&d, "a").unwrap_err().actual, JsonKind::Null);
        assert_eq!(string_field(&d, "b").unwrap_err().actual, JsonKind::Object);
        assert_eq!(string_field(&d, "c").unwrap_err().actual, JsonKind::Array);
    }

    #[test]
    fn test_display_mentions_kind() {
        let d = data(json!({"password": true}));
        let err = string_field(&d, "password").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field \"password\": expected string, found boolean true"
        );
    }
}
