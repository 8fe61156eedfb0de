//! User-authored configuration documents
//!
//! A `RawConfig` holds the document exactly as written. Nothing is checked
//! until the resolver consumes it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::error::ConfigError;

/// How unknown keys are treated during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Unknown keys are rejected with a shape error.
    Strict,
    /// Unknown keys are ignored.
    #[default]
    Loose,
}

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Toml,
}

impl SourceFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// A partially-populated settings document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig {
    document: Value,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl RawConfig {
    /// Wrap an in-memory document.
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    /// A document that sets nothing.
    pub fn empty() -> Self {
        Self {
            document: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let document = serde_json::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))?;
        Ok(Self { document })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::Value = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;
        Ok(Self {
            document: toml_to_json(table, "")?,
        })
    }

    /// Parse a document in the given format, or try JSON then TOML.
    pub fn parse(contents: &str, format: Option<SourceFormat>) -> Result<Self, ConfigError> {
        match format {
            Some(SourceFormat::Json) => Self::from_json_str(contents),
            Some(SourceFormat::Toml) => Self::from_toml_str(contents),
            None => Self::from_json_str(contents).or_else(|json_err| {
                Self::from_toml_str(contents).map_err(|toml_err| {
                    ConfigError::Parse(format!(
                        "not a JSON or TOML document ({}; {})",
                        json_err, toml_err
                    ))
                })
            }),
        }
    }

    /// Load and parse a document from disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, SourceFormat::from_path(path))
    }

    pub(crate) fn from_bytes(bytes: &[u8], format: Option<SourceFormat>) -> Result<Self, ConfigError> {
        let contents = std::str::from_utf8(bytes)
            .map_err(|e| ConfigError::Parse(format!("Invalid UTF-8: {}", e)))?;
        Self::parse(contents, format)
    }

    /// The document as written.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub(crate) fn into_document(self) -> Value {
        self.document
    }
}

/// Convert TOML Value to JSON Value
///
/// `path` names the value in error messages. JSON has no infinities or NaN,
/// so non-finite floats are rejected rather than dropped.
fn toml_to_json(toml: toml::Value, path: &str) -> Result<Value, ConfigError> {
    Ok(match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => match serde_json::Number::from_f64(f) {
            Some(n) => Value::Number(n),
            None => {
                return Err(ConfigError::Parse(format!(
                    "TOML value at '{}' is not a finite number ({})",
                    path, f
                )))
            }
        },
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(
            arr.into_iter()
                .enumerate()
                .map(|(i, v)| toml_to_json(v, &format!("{}[{}]", path, i)))
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| {
                    let child = if path.is_empty() {
                        k.clone()
                    } else {
                        format!("{}.{}", path, k)
                    };
                    toml_to_json(v, &child).map(|v| (k, v))
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}
