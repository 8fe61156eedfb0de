//! Configuration merge logic
//!
//! - Theme: deep-merge by key, extension wins at leaves
//! - Scan patterns and class lists: defaults first, then additions
//! - Plugins and scalars: replaced by the override when present

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::error::ConfigError;
use super::resolved::Theme;

/// Deep merge two token values.
///
/// Merge semantics:
/// - Groups (mappings): deep-merge by key (recursive)
/// - Leaves: overlay wins
/// - A group and a leaf at the same key conflict; replacing either would
///   drop tokens the base defines.
pub fn deep_merge(base: Value, overlay: Value, path: &str) -> Result<Value, ConfigError> {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Ok(Value::Object(merge_maps(base_map, overlay_map, path)?))
        }
        (Value::Object(_), _) => Err(ConfigError::domain(
            path,
            "cannot replace a token group with a single value",
        )),
        (_, Value::Object(_)) => Err(ConfigError::domain(
            path,
            "cannot replace a single token with a token group",
        )),
        (_, overlay) => Ok(overlay),
    }
}

fn merge_maps(
    mut base: Map<String, Value>,
    overlay: Map<String, Value>,
    path: &str,
) -> Result<Map<String, Value>, ConfigError> {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value, &format!("{}.{}", path, key))?,
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    Ok(base)
}

/// Union an extension into a base theme.
///
/// Categories missing from the base are added; shared categories are merged
/// token by token. The base is not modified.
pub fn extend_theme(base: &Theme, extension: Map<String, Value>) -> Result<Theme, ConfigError> {
    let mut categories: BTreeMap<String, Map<String, Value>> = base
        .categories()
        .map(|(name, tokens)| (name.to_string(), tokens.clone()))
        .collect();

    for (name, tokens) in extension {
        let tokens = match tokens {
            Value::Object(tokens) => tokens,
            other => {
                return Err(ConfigError::shape(
                    format!("theme.extend.{}", name),
                    "mapping of tokens",
                    &other,
                ))
            }
        };
        let path = format!("theme.extend.{}", name);
        let merged = match categories.remove(&name) {
            Some(existing) => merge_maps(existing, tokens, &path)?,
            None => tokens,
        };
        categories.insert(name, merged);
    }

    Ok(Theme::from_categories(categories))
}

/// Defaults' entries followed by the additions. Duplicates are kept.
pub fn concat<T: Clone>(base: &[T], additions: Vec<T>) -> Vec<T> {
    let mut merged = Vec::with_capacity(base.len() + additions.len());
    merged.extend_from_slice(base);
    merged.extend(additions);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn theme(value: Value) -> Theme {
        Theme::from_categories(
            object(value)
                .into_iter()
                .map(|(k, v)| (k, object(v)))
                .collect(),
        )
    }

    #[test]
    fn test_leaf_override() {
        let result = deep_merge(json!({"brand": "#000"}), json!({"brand": "#0af"}), "colors").unwrap();
        assert_eq!(result["brand"], "#0af");
    }

    #[test]
    fn test_group_deep_merge() {
        let base = json!({
            "gray": {
                "100": "#f3f4f6",
                "500": "#6b7280"
            }
        });
        let overlay = json!({
            "gray": {
                "500": "#777"
            }
        });
        let result = deep_merge(base, overlay, "colors").unwrap();

        // 500 should be overridden
        assert_eq!(result["gray"]["500"], "#777");
        // 100 should be preserved
        assert_eq!(result["gray"]["100"], "#f3f4f6");
    }

    #[test]
    fn test_sequence_leaf_replaced() {
        let base = json!({"sans": ["ui-sans-serif", "system-ui"]});
        let overlay = json!({"sans": ["Inter"]});
        let result = deep_merge(base, overlay, "fontFamily").unwrap();

        // Sequences are leaves: replaced, not concatenated
        assert_eq!(result["sans"], json!(["Inter"]));
    }

    #[test]
    fn test_group_leaf_conflicts() {
        let err = deep_merge(
            json!({"gray": {"500": "#6b7280"}}),
            json!({"gray": "#888"}),
            "theme.extend.colors",
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("theme.extend.colors.gray"));

        let err = deep_merge(
            json!({"black": "#000"}),
            json!({"black": {"DEFAULT": "#000"}}),
            "theme.extend.colors",
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("theme.extend.colors.black"));
    }

    #[test]
    fn test_extend_theme_adds_and_merges() {
        let base = theme(json!({
            "colors": {"black": "#000", "gray": {"500": "#6b7280"}},
            "spacing": {"1": "0.25rem"}
        }));
        let extension = object(json!({
            "colors": {"brand": "#0af", "gray": {"950": "#030712"}},
            "zIndex": {"60": 60}
        }));

        let merged = extend_theme(&base, extension).unwrap();

        assert_eq!(merged.lookup("colors", &["black"]), Some(&json!("#000")));
        assert_eq!(merged.lookup("colors", &["brand"]), Some(&json!("#0af")));
        assert_eq!(merged.lookup("colors", &["gray", "500"]), Some(&json!("#6b7280")));
        assert_eq!(merged.lookup("colors", &["gray", "950"]), Some(&json!("#030712")));
        assert_eq!(merged.lookup("spacing", &["1"]), Some(&json!("0.25rem")));
        assert_eq!(merged.lookup("zIndex", &["60"]), Some(&json!(60)));
        assert!(merged.covers(&base));

        // base untouched
        assert_eq!(base.lookup("colors", &["brand"]), None);
    }

    #[test]
    fn test_extend_theme_empty_extension() {
        let base = theme(json!({"colors": {"black": "#000"}}));
        assert_eq!(extend_theme(&base, Map::new()).unwrap(), base);
    }

    #[test]
    fn test_concat_keeps_duplicates() {
        let merged = concat(&["a".to_string(), "b".to_string()], vec!["b".to_string()]);
        assert_eq!(merged, vec!["a", "b", "b"]);
    }
}
