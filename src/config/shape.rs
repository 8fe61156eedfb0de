//! Shape validation
//!
//! Checks that every known field holds the right kind of value and turns the
//! untyped document into [`ShapedConfig`]. Value domains are checked later.

use serde_json::{Map, Value};

use super::error::ConfigError;
use super::raw::ValidationMode;
use super::resolved::PluginReference;

const TOP_LEVEL_KEYS: &[&str] = &[
    "darkMode",
    "content",
    "theme",
    "plugins",
    "prefix",
    "important",
    "safelist",
    "blocklist",
];

/// `darkMode` as written, before its value is checked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawDarkMode {
    /// `"media"`, `"selector"`, `"class"`, ...
    Keyword(String),
    /// `{ "selector": ".dark" }`
    Selector(String),
    /// `["selector", ".dark"]` or `["class"]`
    Pair(String, Option<String>),
    /// `false` or `true`
    Flag(bool),
}

/// `important` as written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawImportant {
    Flag(bool),
    Selector(String),
}

/// A document whose fields all have the right kind.
#[derive(Debug, Default)]
pub(crate) struct ShapedConfig {
    pub dark_mode: Option<RawDarkMode>,
    pub content: Vec<String>,
    pub theme_extend: Option<Map<String, Value>>,
    pub plugins: Option<Vec<PluginReference>>,
    pub prefix: Option<String>,
    pub important: Option<RawImportant>,
    pub safelist: Vec<String>,
    pub blocklist: Vec<String>,
}

/// Check the kind of every known field.
pub(crate) fn read_document(document: Value, mode: ValidationMode) -> Result<ShapedConfig, ConfigError> {
    let root = match document {
        Value::Object(map) => map,
        other => return Err(ConfigError::shape("<root>", "mapping", &other)),
    };

    let mut shaped = ShapedConfig::default();

    for (key, value) in root {
        match key.as_str() {
            "darkMode" => shaped.dark_mode = Some(read_dark_mode(value, mode)?),
            "content" => shaped.content = read_strings("content", value)?,
            "theme" => shaped.theme_extend = read_theme(value, mode)?,
            "plugins" => shaped.plugins = Some(read_plugins(value, mode)?),
            "prefix" => shaped.prefix = Some(read_string("prefix", value)?),
            "important" => shaped.important = Some(read_important(value)?),
            "safelist" => shaped.safelist = read_strings("safelist", value)?,
            "blocklist" => shaped.blocklist = read_strings("blocklist", value)?,
            _ => unknown_key(&key, TOP_LEVEL_KEYS, mode)?,
        }
    }

    Ok(shaped)
}

fn unknown_key(field: &str, allowed: &[&str], mode: ValidationMode) -> Result<(), ConfigError> {
    match mode {
        ValidationMode::Strict => Err(ConfigError::unknown_key(
            field,
            format!("one of {}", allowed.join(", ")),
        )),
        ValidationMode::Loose => {
            tracing::warn!(key = %field, "ignoring unknown configuration key");
            Ok(())
        }
    }
}

fn read_string(field: &str, value: Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ConfigError::shape(field, "string", &other)),
    }
}

fn read_strings(field: &str, value: Value) -> Result<Vec<String>, ConfigError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(ConfigError::shape(field, "sequence of strings", &other)),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| read_string(&format!("{}[{}]", field, i), item))
        .collect()
}

fn read_dark_mode(value: Value, mode: ValidationMode) -> Result<RawDarkMode, ConfigError> {
    match value {
        Value::String(keyword) => Ok(RawDarkMode::Keyword(keyword)),
        Value::Bool(flag) => Ok(RawDarkMode::Flag(flag)),
        Value::Object(map) => {
            let mut selector = None;
            for (key, value) in map {
                match key.as_str() {
                    "selector" => selector = Some(read_string("darkMode.selector", value)?),
                    _ => unknown_key(&format!("darkMode.{}", key), &["selector"], mode)?,
                }
            }
            selector
                .map(RawDarkMode::Selector)
                .ok_or_else(|| ConfigError::missing("darkMode.selector", "string"))
        }
        Value::Array(items) => {
            if items.is_empty() || items.len() > 2 {
                return Err(ConfigError::Shape {
                    field: "darkMode".to_string(),
                    expected: "[strategy] or [strategy, selector]".to_string(),
                    actual: format!("sequence of {} items", items.len()),
                });
            }
            let mut items = items.into_iter();
            let keyword = match items.next() {
                Some(first) => read_string("darkMode[0]", first)?,
                None => return Err(ConfigError::missing("darkMode[0]", "string")),
            };
            let selector = items
                .next()
                .map(|second| read_string("darkMode[1]", second))
                .transpose()?;
            Ok(RawDarkMode::Pair(keyword, selector))
        }
        other => Err(ConfigError::shape(
            "darkMode",
            "string, mapping, sequence or false",
            &other,
        )),
    }
}

fn read_important(value: Value) -> Result<RawImportant, ConfigError> {
    match value {
        Value::Bool(flag) => Ok(RawImportant::Flag(flag)),
        Value::String(selector) => Ok(RawImportant::Selector(selector)),
        other => Err(ConfigError::shape("important", "boolean or selector string", &other)),
    }
}

fn read_theme(value: Value, mode: ValidationMode) -> Result<Option<Map<String, Value>>, ConfigError> {
    let map = match value {
        Value::Object(map) => map,
        other => return Err(ConfigError::shape("theme", "mapping", &other)),
    };

    let mut extend = None;
    for (key, value) in map {
        match key.as_str() {
            "extend" => extend = Some(read_extension(value)?),
            _ => unknown_key(&format!("theme.{}", key), &["extend"], mode)?,
        }
    }
    Ok(extend)
}

fn read_extension(value: Value) -> Result<Map<String, Value>, ConfigError> {
    let categories = match value {
        Value::Object(map) => map,
        other => return Err(ConfigError::shape("theme.extend", "mapping", &other)),
    };

    for (category, tokens) in &categories {
        let field = format!("theme.extend.{}", category);
        match tokens {
            Value::Object(tokens) => check_tokens(&field, tokens)?,
            other => return Err(ConfigError::shape(field, "mapping of tokens", other)),
        }
    }
    Ok(categories)
}

fn check_tokens(field: &str, tokens: &Map<String, Value>) -> Result<(), ConfigError> {
    for (name, value) in tokens {
        let field = format!("{}.{}", field, name);
        match value {
            Value::String(_) | Value::Number(_) => {}
            Value::Object(nested) => check_tokens(&field, nested)?,
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !(item.is_string() || item.is_number()) {
                        return Err(ConfigError::shape(
                            format!("{}[{}]", field, i),
                            "string or number",
                            item,
                        ));
                    }
                }
            }
            other => {
                return Err(ConfigError::shape(
                    field,
                    "string, number, sequence or mapping",
                    other,
                ))
            }
        }
    }
    Ok(())
}

fn read_plugins(value: Value, mode: ValidationMode) -> Result<Vec<PluginReference>, ConfigError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(ConfigError::shape("plugins", "sequence", &other)),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| read_plugin(&format!("plugins[{}]", i), item, mode))
        .collect()
}

fn read_plugin(field: &str, value: Value, mode: ValidationMode) -> Result<PluginReference, ConfigError> {
    match value {
        Value::String(id) => Ok(PluginReference::Bare(id)),
        Value::Object(map) => {
            let mut id = None;
            let mut options = None;
            for (key, value) in map {
                let key_field = format!("{}.{}", field, key);
                match key.as_str() {
                    "id" => id = Some(read_string(&key_field, value)?),
                    "options" => options = Some(read_options(&key_field, value)?),
                    _ => unknown_key(&key_field, &["id", "options"], mode)?,
                }
            }
            let id = id.ok_or_else(|| ConfigError::missing(format!("{}.id", field), "string"))?;
            Ok(match options {
                Some(options) => PluginReference::WithOptions(id, options),
                None => PluginReference::Bare(id),
            })
        }
        Value::Array(items) => {
            let len = items.len();
            let mut items = items.into_iter();
            match (items.next(), items.next(), len) {
                (Some(id), None, 1) => Ok(PluginReference::Bare(read_string(&format!("{}[0]", field), id)?)),
                (Some(id), Some(options), 2) => Ok(PluginReference::WithOptions(
                    read_string(&format!("{}[0]", field), id)?,
                    read_options(&format!("{}[1]", field), options)?,
                )),
                _ => Err(ConfigError::Shape {
                    field: field.to_string(),
                    expected: "[id] or [id, options]".to_string(),
                    actual: format!("sequence of {} items", len),
                }),
            }
        }
        other => Err(ConfigError::shape(
            field,
            "plugin id, {id, options} mapping or [id, options] pair",
            &other,
        )),
    }
}

fn read_options(field: &str, value: Value) -> Result<Map<String, Value>, ConfigError> {
    match value {
        Value::Object(options) => Ok(options),
        other => Err(ConfigError::shape(field, "mapping", &other)),
    }
}
