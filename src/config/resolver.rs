//! Configuration resolution
//!
//! Turns a raw document into a [`ResolvedConfig`] in four steps:
//! 1. Shape validation
//! 2. Domain validation
//! 3. Merge over the defaults
//! 4. Freeze
//!
//! A failure at any step returns the error and nothing else. The defaults are
//! only ever borrowed.

use super::domain;
use super::error::ConfigError;
use super::merge::{concat, extend_theme};
use super::raw::{RawConfig, ValidationMode};
use super::resolved::ResolvedConfig;
use super::shape::read_document;

/// Resolve a document over `defaults` with the default (loose) mode.
pub fn resolve(raw: RawConfig, defaults: &ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    ConfigResolver::default().resolve(raw, defaults)
}

/// Resolves raw documents against a fixed baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigResolver {
    mode: ValidationMode,
}

impl ConfigResolver {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    /// Reject unknown keys.
    pub fn strict() -> Self {
        Self::new(ValidationMode::Strict)
    }

    /// Ignore unknown keys.
    pub fn loose() -> Self {
        Self::new(ValidationMode::Loose)
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Resolve one document over `defaults`.
    pub fn resolve(&self, raw: RawConfig, defaults: &ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
        let shaped = read_document(raw.into_document(), self.mode)?;

        let dark_mode = shaped.dark_mode.map(domain::dark_mode).transpose()?;
        let content = domain::content_patterns("content", shaped.content)?;
        if let Some(plugins) = &shaped.plugins {
            domain::plugins(plugins)?;
        }
        let prefix = shaped.prefix.map(domain::prefix).transpose()?;
        let important = shaped.important.map(domain::important).transpose()?;
        let safelist = domain::class_names("safelist", shaped.safelist)?;
        let blocklist = domain::class_names("blocklist", shaped.blocklist)?;

        let theme = match shaped.theme_extend {
            Some(extension) => extend_theme(&defaults.theme, extension)?,
            None => defaults.theme.clone(),
        };

        let resolved = ResolvedConfig {
            dark_mode: dark_mode.unwrap_or_else(|| defaults.dark_mode.clone()),
            content: concat(&defaults.content, content),
            theme,
            plugins: shaped.plugins.unwrap_or_else(|| defaults.plugins.clone()),
            prefix: prefix.unwrap_or_else(|| defaults.prefix.clone()),
            important: important.unwrap_or_else(|| defaults.important.clone()),
            safelist: concat(&defaults.safelist, safelist),
            blocklist: concat(&defaults.blocklist, blocklist),
        };

        tracing::debug!(
            dark_mode = %resolved.dark_mode,
            content = resolved.content.len(),
            plugins = resolved.plugins.len(),
            theme_categories = resolved.theme.categories().count(),
            "resolved configuration"
        );

        Ok(resolved)
    }

    /// Resolve documents in order, each result serving as the defaults of the
    /// next (first is closest to the defaults, last has highest precedence).
    pub fn resolve_layers<I>(&self, layers: I, defaults: &ResolvedConfig) -> Result<ResolvedConfig, ConfigError>
    where
        I: IntoIterator<Item = RawConfig>,
    {
        let mut current = defaults.clone();
        for (i, layer) in layers.into_iter().enumerate() {
            tracing::debug!(layer = i, "resolving configuration layer");
            current = self.resolve(layer, &current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DarkModeStrategy, PluginReference};
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawConfig {
        RawConfig::from_value(value)
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let defaults = ResolvedConfig::builtin();
        let resolved = resolve(RawConfig::empty(), &defaults).unwrap();
        assert_eq!(resolved, defaults);
    }

    #[test]
    fn test_scalars_override() {
        let defaults = ResolvedConfig::builtin();
        let resolved = resolve(
            raw(json!({"darkMode": false, "prefix": "tw-", "important": true})),
            &defaults,
        )
        .unwrap();

        assert_eq!(resolved.dark_mode(), &DarkModeStrategy::Disabled);
        assert_eq!(resolved.prefix(), "tw-");
        assert_eq!(resolved.important(), &crate::config::Important::Flag(true));
    }

    #[test]
    fn test_plugins_replace_even_when_empty() {
        let defaults = resolve(raw(json!({"plugins": ["a", "b"]})), &ResolvedConfig::builtin()).unwrap();

        let kept = resolve(RawConfig::empty(), &defaults).unwrap();
        assert_eq!(kept.plugins().len(), 2);

        let replaced = resolve(raw(json!({"plugins": ["c"]})), &defaults).unwrap();
        assert_eq!(replaced.plugins(), &[PluginReference::Bare("c".into())]);

        let cleared = resolve(raw(json!({"plugins": []})), &defaults).unwrap();
        assert!(cleared.plugins().is_empty());
    }

    #[test]
    fn test_shape_errors_come_before_domain_errors() {
        let err = resolve(
            raw(json!({"content": [""], "plugins": "typography"})),
            &ResolvedConfig::builtin(),
        )
        .unwrap_err();
        assert!(err.is_shape());
        assert_eq!(err.field(), Some("plugins"));
    }

    #[test]
    fn test_theme_conflict_aborts() {
        let defaults = ResolvedConfig::builtin();
        let err = resolve(
            raw(json!({"theme": {"extend": {"colors": {"gray": "#888"}}}})),
            &defaults,
        )
        .unwrap_err();
        assert!(err.is_domain());
        assert_eq!(err.field(), Some("theme.extend.colors.gray"));
    }

    #[test]
    fn test_resolve_layers() {
        let layers = vec![
            raw(json!({"content": ["base/**/*.html"], "plugins": ["a"], "darkMode": "selector"})),
            raw(json!({"content": ["site/**/*.html"], "theme": {"extend": {"colors": {"brand": "#0af"}}}})),
            raw(json!({"plugins": ["b"]})),
        ];

        let resolved = ConfigResolver::strict()
            .resolve_layers(layers, &ResolvedConfig::builtin())
            .unwrap();

        let content: Vec<&str> = resolved.content().iter().map(|p| p.as_str()).collect();
        assert_eq!(content, vec!["base/**/*.html", "site/**/*.html"]);
        assert_eq!(resolved.plugins(), &[PluginReference::Bare("b".into())]);
        assert_eq!(resolved.dark_mode(), &DarkModeStrategy::SelectorBased(".dark".into()));
        assert_eq!(resolved.theme().lookup("colors", &["brand"]), Some(&json!("#0af")));
    }

    #[test]
    fn test_resolve_layers_all_or_nothing() {
        let layers = vec![
            raw(json!({"content": ["a.html"]})),
            raw(json!({"darkMode": {"selector": ""}})),
        ];
        let err = ConfigResolver::loose()
            .resolve_layers(layers, &ResolvedConfig::builtin())
            .unwrap_err();
        assert_eq!(err.field(), Some("darkMode.selector"));
    }

    #[test]
    fn test_resolver_mode() {
        assert_eq!(ConfigResolver::default().mode(), ValidationMode::Loose);
        assert_eq!(ConfigResolver::strict().mode(), ValidationMode::Strict);
    }
}
