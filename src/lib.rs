//! windcfg - configuration resolver for utility-CSS build tooling
//!
//! This crate loads a project's utility-CSS settings document (scan
//! patterns, dark-mode strategy, theme extension, plugin list), validates
//! it, merges it over built-in defaults, and hands downstream consumers an
//! immutable resolved configuration.

pub mod config;
pub mod plugin;

pub use config::{
    resolve, ConfigError, ConfigResolver, ContentPattern, DarkModeStrategy, EffectiveConfig,
    LiveConfig, PluginReference, RawConfig, ResolvedConfig, Theme, ValidationMode,
};
pub use plugin::{load_plugins, PluginLoader, PluginRegistry, PluginResolutionError};
