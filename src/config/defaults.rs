//! Built-in defaults
//!
//! The baseline every resolution starts from: media-query dark mode, no scan
//! patterns, no plugins, and a small core theme.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use super::resolved::{DarkModeStrategy, Important, ResolvedConfig, Theme};

/// Build the built-in baseline.
pub(crate) fn builtin() -> ResolvedConfig {
    ResolvedConfig {
        dark_mode: DarkModeStrategy::MediaQuery,
        content: Vec::new(),
        theme: builtin_theme(),
        plugins: Vec::new(),
        prefix: String::new(),
        important: Important::default(),
        safelist: Vec::new(),
        blocklist: Vec::new(),
    }
}

fn builtin_theme() -> Theme {
    let categories: BTreeMap<String, Map<String, Value>> = match builtin_theme_value() {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(name, tokens)| match tokens {
                Value::Object(tokens) => Some((name, tokens)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    };
    Theme::from_categories(categories)
}

fn builtin_theme_value() -> Value {
    json!({
        "screens": {
            "sm": "640px",
            "md": "768px",
            "lg": "1024px",
            "xl": "1280px",
            "2xl": "1536px"
        },
        "colors": {
            "transparent": "transparent",
            "current": "currentColor",
            "black": "#000",
            "white": "#fff",
            "gray": {
                "100": "#f3f4f6",
                "300": "#d1d5db",
                "500": "#6b7280",
                "700": "#374151",
                "900": "#111827"
            }
        },
        "spacing": {
            "px": "1px",
            "0": "0px",
            "0.5": "0.125rem",
            "1": "0.25rem",
            "2": "0.5rem",
            "4": "1rem",
            "8": "2rem"
        },
        "borderRadius": {
            "none": "0px",
            "sm": "0.125rem",
            "DEFAULT": "0.25rem",
            "full": "9999px"
        },
        "fontFamily": {
            "sans": ["ui-sans-serif", "system-ui", "sans-serif"],
            "mono": ["ui-monospace", "monospace"]
        }
    })
}
