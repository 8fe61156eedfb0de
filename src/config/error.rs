//! Configuration errors
//!
//! Every validation failure names the offending field path
//! (`content[2]`, `darkMode.selector`, `theme.extend.colors.brand`).

use serde_json::Value;
use std::io;

use crate::plugin::PluginResolutionError;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A known field holds a value of the wrong kind.
    #[error("{field}: expected {expected}, found {actual}")]
    Shape {
        field: String,
        expected: String,
        actual: String,
    },

    /// A field has the right kind but an invalid value.
    #[error("{field}: {reason}")]
    Domain { field: String, reason: String },

    /// Raised by a plugin loader; passed through as-is.
    #[error(transparent)]
    PluginResolution(#[from] PluginResolutionError),

    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Canonicalization error: {0}")]
    Canonicalize(String),
}

impl ConfigError {
    pub(crate) fn shape(field: impl Into<String>, expected: impl Into<String>, actual: &Value) -> Self {
        Self::Shape {
            field: field.into(),
            expected: expected.into(),
            actual: kind_of(actual).to_string(),
        }
    }

    pub(crate) fn unknown_key(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Shape {
            field: field.into(),
            expected: expected.into(),
            actual: "unknown key".to_string(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Shape {
            field: field.into(),
            expected: expected.into(),
            actual: "nothing".to_string(),
        }
    }

    pub(crate) fn domain(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Domain {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Field path the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Shape { field, .. } | Self::Domain { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }
}

/// Human name for the kind of a document value.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_message_names_field() {
        let err = ConfigError::shape("content", "sequence of strings", &json!("index.html"));
        assert_eq!(
            err.to_string(),
            "content: expected sequence of strings, found string"
        );
        assert_eq!(err.field(), Some("content"));
        assert!(err.is_shape());
    }

    #[test]
    fn test_domain_message() {
        let err = ConfigError::domain("darkMode.selector", "selector is empty");
        assert_eq!(err.to_string(), "darkMode.selector: selector is empty");
        assert!(err.is_domain());
    }

    #[test]
    fn test_plugin_error_passes_through() {
        let inner = PluginResolutionError::new("@acme/missing", "not installed");
        let err: ConfigError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.field(), None);
    }
}
