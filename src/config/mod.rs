//! Configuration resolution
//!
//! A raw document is resolved over a baseline in four steps:
//! 1. Shape validation (value kinds)
//! 2. Domain validation (value contents)
//! 3. Merge over the baseline
//! 4. Freeze into a `ResolvedConfig`

mod defaults;
mod domain;
mod effective;
mod error;
mod live;
mod merge;
mod raw;
mod resolved;
mod resolver;
mod shape;

pub use effective::{ConfigOrigin, ConfigSource, EffectiveConfig, SCHEMA_ID, SCHEMA_VERSION};
pub use error::ConfigError;
pub use live::{LiveConfig, Reload};
pub use merge::{concat, deep_merge, extend_theme};
pub use raw::{RawConfig, SourceFormat, ValidationMode};
pub use resolved::{
    ContentPattern, DarkModeStrategy, Important, PluginReference, ResolvedConfig, Theme,
    DEFAULT_DARK_SELECTOR,
};
pub use resolver::{resolve, ConfigResolver};
