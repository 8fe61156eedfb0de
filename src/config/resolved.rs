//! The resolved configuration handed to downstream consumers
//!
//! A `ResolvedConfig` is fully defaulted and validated. Its fields are
//! private; the only ways to obtain one are [`ResolvedConfig::builtin`] and
//! the resolver.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use super::error::ConfigError;
use super::raw::RawConfig;

/// Selector used when the selector strategy is chosen without one.
pub const DEFAULT_DARK_SELECTOR: &str = ".dark";

/// How dark-mode variants are activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DarkModeStrategy {
    /// `prefers-color-scheme: dark`
    MediaQuery,
    /// Active when an ancestor matches the selector.
    SelectorBased(String),
    Disabled,
}

impl DarkModeStrategy {
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::SelectorBased(selector) => Some(selector),
            _ => None,
        }
    }

    /// Document form accepted by the resolver.
    pub fn to_value(&self) -> Value {
        match self {
            Self::MediaQuery => json!("media"),
            Self::SelectorBased(selector) => json!({ "selector": selector }),
            Self::Disabled => json!(false),
        }
    }
}

impl fmt::Display for DarkModeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MediaQuery => write!(f, "media"),
            Self::SelectorBased(selector) => write!(f, "selector ({})", selector),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

impl Serialize for DarkModeStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::MediaQuery => serializer.serialize_str("media"),
            Self::SelectorBased(selector) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("selector", selector)?;
                map.end()
            }
            Self::Disabled => serializer.serialize_bool(false),
        }
    }
}

/// A validated glob pattern from `content`.
///
/// A leading `!` marks an exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentPattern(String);

impl ContentPattern {
    pub(crate) fn new_unchecked(pattern: String) -> Self {
        Self(pattern)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_negated(&self) -> bool {
        self.0.starts_with('!')
    }

    /// The glob without the negation marker.
    pub fn glob(&self) -> &str {
        self.0.strip_prefix('!').unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A plugin entry, handed to the plugin loader untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PluginReference {
    Bare(String),
    WithOptions(String, Map<String, Value>),
}

impl PluginReference {
    pub fn id(&self) -> &str {
        match self {
            Self::Bare(id) | Self::WithOptions(id, _) => id,
        }
    }

    pub fn options(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Bare(_) => None,
            Self::WithOptions(_, options) => Some(options),
        }
    }
}

/// `important` setting: a flag, or a selector that scopes every utility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Important {
    Flag(bool),
    Selector(String),
}

impl Default for Important {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Design tokens grouped by category (`colors`, `spacing`, ...).
///
/// Token values are strings, numbers, sequences of those, or nested groups
/// such as color shades.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Theme {
    categories: BTreeMap<String, Map<String, Value>>,
}

impl Theme {
    pub(crate) fn from_categories(categories: BTreeMap<String, Map<String, Value>>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn category(&self, name: &str) -> Option<&Map<String, Value>> {
        self.categories.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a token by category and key path, e.g.
    /// `lookup("colors", &["gray", "500"])`.
    ///
    /// Keys are passed separately because token names may contain dots
    /// (`spacing."0.5"`).
    pub fn lookup(&self, category: &str, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.categories.get(category)?.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// True when every key path of `base` also exists here.
    pub fn covers(&self, base: &Theme) -> bool {
        base.categories.iter().all(|(name, base_tokens)| {
            self.categories
                .get(name)
                .is_some_and(|tokens| map_covers(tokens, base_tokens))
        })
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.categories
                .iter()
                .map(|(k, v)| (k.clone(), Value::Object(v.clone())))
                .collect(),
        )
    }
}

fn map_covers(map: &Map<String, Value>, base: &Map<String, Value>) -> bool {
    base.iter().all(|(key, base_value)| match (map.get(key), base_value) {
        (Some(Value::Object(inner)), Value::Object(base_inner)) => map_covers(inner, base_inner),
        (Some(Value::Object(_)), _) | (Some(_), Value::Object(_)) => false,
        (Some(_), _) => true,
        (None, _) => false,
    })
}

/// Fully-resolved, immutable configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub(crate) dark_mode: DarkModeStrategy,
    pub(crate) content: Vec<ContentPattern>,
    pub(crate) theme: Theme,
    pub(crate) plugins: Vec<PluginReference>,
    pub(crate) prefix: String,
    pub(crate) important: Important,
    pub(crate) safelist: Vec<String>,
    pub(crate) blocklist: Vec<String>,
}

impl ResolvedConfig {
    /// The built-in baseline every resolution starts from.
    pub fn builtin() -> Self {
        super::defaults::builtin()
    }

    pub fn dark_mode(&self) -> &DarkModeStrategy {
        &self.dark_mode
    }

    /// Scan patterns, in order.
    pub fn content(&self) -> &[ContentPattern] {
        &self.content
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Plugin references, in load order.
    pub fn plugins(&self) -> &[PluginReference] {
        &self.plugins
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn important(&self) -> &Important {
        &self.important
    }

    pub fn safelist(&self) -> &[String] {
        &self.safelist
    }

    pub fn blocklist(&self) -> &[String] {
        &self.blocklist
    }

    /// Project back to document form.
    ///
    /// Resolving the result against the same `defaults` yields a config equal
    /// to `self`. List settings drop the entries contributed by `defaults`;
    /// the theme is emitted whole as an extension.
    pub fn to_raw(&self, defaults: &ResolvedConfig) -> RawConfig {
        let content: Vec<&str> = strip_prefix(&self.content, &defaults.content)
            .iter()
            .map(ContentPattern::as_str)
            .collect();

        RawConfig::from_value(json!({
            "darkMode": self.dark_mode.to_value(),
            "content": content,
            "theme": { "extend": self.theme.to_value() },
            "plugins": self.plugins,
            "prefix": self.prefix,
            "important": self.important,
            "safelist": strip_prefix(&self.safelist, &defaults.safelist),
            "blocklist": strip_prefix(&self.blocklist, &defaults.blocklist),
        }))
    }

    /// SHA-256 of the canonical (RFC 8785) JSON form.
    pub fn digest(&self) -> Result<String, ConfigError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(self)
            .map_err(|e| ConfigError::Canonicalize(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

fn strip_prefix<'a, T: PartialEq>(items: &'a [T], base: &[T]) -> &'a [T] {
    if items.starts_with(base) {
        &items[base.len()..]
    } else {
        items
    }
}
