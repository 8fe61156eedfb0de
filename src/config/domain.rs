//! Domain validation
//!
//! Values that have the right kind but are not acceptable: empty or escaping
//! content globs, malformed selectors, blank plugin ids, bad prefixes.

use globset::Glob;
use regex_lite::Regex;
use std::sync::OnceLock;
use windcfg_selector::validate_selector;

use super::error::ConfigError;
use super::resolved::{ContentPattern, DarkModeStrategy, Important, PluginReference, DEFAULT_DARK_SELECTOR};
use super::shape::{RawDarkMode, RawImportant};

/// Validate scan patterns, keeping their order.
pub(crate) fn content_patterns(field: &str, patterns: Vec<String>) -> Result<Vec<ContentPattern>, ConfigError> {
    patterns
        .into_iter()
        .enumerate()
        .map(|(i, pattern)| content_pattern(&format!("{}[{}]", field, i), pattern))
        .collect()
}

fn content_pattern(field: &str, pattern: String) -> Result<ContentPattern, ConfigError> {
    let trimmed = pattern.trim();
    let (negated, glob) = match trimmed.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    if glob.is_empty() {
        return Err(ConfigError::domain(field, "pattern is empty"));
    }
    let alternatives = expand_braces(glob).ok_or_else(|| {
        ConfigError::domain(
            field,
            format!("pattern expands to more than {} alternatives", MAX_ALTERNATIVES),
        )
    })?;
    if let Some(outside) = alternatives.iter().find(|alt| escapes_root(alt)) {
        return Err(ConfigError::domain(
            field,
            format!("pattern '{}' resolves outside the project root ({})", glob, outside),
        ));
    }
    Glob::new(glob).map_err(|e| ConfigError::domain(field, format!("invalid glob: {}", e)))?;

    let stored = if negated {
        format!("!{}", glob)
    } else {
        glob.to_string()
    };
    Ok(ContentPattern::new_unchecked(stored))
}

/// Upper bound on `{a,b}` expansion of a single pattern.
const MAX_ALTERNATIVES: usize = 1024;

/// Expand `{a,b}` alternation into the concrete patterns it stands for.
///
/// Returns `None` past [`MAX_ALTERNATIVES`]. Unbalanced braces are left as
/// written; the glob compiler reports them.
fn expand_braces(glob: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    expand_into(glob, &mut out)?;
    Some(out)
}

fn expand_into(glob: &str, out: &mut Vec<String>) -> Option<()> {
    let Some((open, close)) = first_group(glob) else {
        if out.len() >= MAX_ALTERNATIVES {
            return None;
        }
        out.push(glob.to_string());
        return Some(());
    };

    let (head, body, tail) = (&glob[..open], &glob[open + 1..close], &glob[close + 1..]);
    for alternative in split_alternatives(body) {
        expand_into(&format!("{}{}{}", head, alternative, tail), out)?;
    }
    Some(())
}

/// Byte offsets of the first balanced top-level `{...}` group.
fn first_group(glob: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut open = 0;
    let mut escaped = false;
    for (i, b) in glob.bytes().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'{' => {
                if depth == 0 {
                    open = i;
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some((open, i));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a group body on its top-level commas.
fn split_alternatives(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut escaped = false;
    for (i, b) in body.bytes().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Absolute paths, drive prefixes, and `..` segments climbing above the
/// starting directory all leave the project root. `**` may match no
/// directory at all, so it does not count as depth.
fn escapes_root(glob: &str) -> bool {
    if glob.starts_with('/') || glob.starts_with('\\') || glob.starts_with('~') {
        return true;
    }
    let bytes = glob.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return true;
    }

    let mut depth: i64 = 0;
    for segment in glob.split(['/', '\\']) {
        match segment {
            "" | "." | "**" => {}
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => depth += 1,
        }
    }
    false
}

pub(crate) fn dark_mode(raw: RawDarkMode) -> Result<DarkModeStrategy, ConfigError> {
    match raw {
        RawDarkMode::Keyword(keyword) => strategy_from_keyword("darkMode", &keyword, None),
        RawDarkMode::Pair(keyword, selector) => {
            strategy_from_keyword("darkMode[0]", &keyword, selector.map(|s| ("darkMode[1]", s)))
        }
        RawDarkMode::Selector(selector) => {
            Ok(DarkModeStrategy::SelectorBased(selector_value("darkMode.selector", selector)?))
        }
        RawDarkMode::Flag(false) => Ok(DarkModeStrategy::Disabled),
        RawDarkMode::Flag(true) => Err(ConfigError::domain(
            "darkMode",
            "`true` is not a strategy; use \"media\", \"selector\" or false",
        )),
    }
}

fn strategy_from_keyword(
    field: &str,
    keyword: &str,
    selector: Option<(&str, String)>,
) -> Result<DarkModeStrategy, ConfigError> {
    match keyword {
        "selector" | "class" => {
            let selector = match selector {
                Some((selector_field, selector)) => selector_value(selector_field, selector)?,
                None => DEFAULT_DARK_SELECTOR.to_string(),
            };
            Ok(DarkModeStrategy::SelectorBased(selector))
        }
        "media" => match selector {
            Some((selector_field, _)) => Err(ConfigError::domain(
                selector_field,
                "the media strategy does not take a selector",
            )),
            None => Ok(DarkModeStrategy::MediaQuery),
        },
        other => Err(ConfigError::domain(
            field,
            format!("unknown strategy '{}' (expected \"media\" or \"selector\")", other),
        )),
    }
}

fn selector_value(field: &str, selector: String) -> Result<String, ConfigError> {
    validate_selector(&selector)
        .map_err(|e| ConfigError::domain(field, format!("invalid selector: {}", e)))?;
    Ok(selector.trim().to_string())
}

pub(crate) fn important(raw: RawImportant) -> Result<Important, ConfigError> {
    match raw {
        RawImportant::Flag(flag) => Ok(Important::Flag(flag)),
        RawImportant::Selector(selector) => {
            Ok(Important::Selector(selector_value("important", selector)?))
        }
    }
}

pub(crate) fn plugins(plugins: &[PluginReference]) -> Result<(), ConfigError> {
    for (i, plugin) in plugins.iter().enumerate() {
        let id = plugin.id();
        if id.trim().is_empty() {
            return Err(ConfigError::domain(format!("plugins[{}]", i), "plugin id is empty"));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ConfigError::domain(
                format!("plugins[{}]", i),
                format!("plugin id '{}' contains whitespace", id),
            ));
        }
    }
    Ok(())
}

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("prefix pattern compiles"))
}

pub(crate) fn prefix(prefix: String) -> Result<String, ConfigError> {
    if prefix.is_empty() || prefix_pattern().is_match(&prefix) {
        Ok(prefix)
    } else {
        Err(ConfigError::domain(
            "prefix",
            format!(
                "'{}' must start with a letter and contain only letters, digits, '-' or '_'",
                prefix
            ),
        ))
    }
}

/// Class-name lists (`safelist`, `blocklist`): no blank entries.
pub(crate) fn class_names(field: &str, names: Vec<String>) -> Result<Vec<String>, ConfigError> {
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(ConfigError::domain(format!("{}[{}]", field, i), "class name is empty"))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}
