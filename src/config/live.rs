//! Live configuration snapshots for watch-mode hosts
//!
//! Consumers hold an `Arc<ResolvedConfig>`. A reload resolves a complete new
//! snapshot before swapping it in; snapshots already handed out stay valid,
//! and a failed reload leaves the current snapshot in place.

use std::sync::Arc;

use super::error::ConfigError;
use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use super::resolver::ConfigResolver;

/// Outcome of a successful reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    /// The new document resolved to the current settings.
    Unchanged,
    /// A new snapshot is now current.
    Swapped { generation: u64 },
}

/// Holder of the current resolved snapshot.
#[derive(Debug)]
pub struct LiveConfig {
    resolver: ConfigResolver,
    defaults: ResolvedConfig,
    current: Arc<ResolvedConfig>,
    generation: u64,
}

impl LiveConfig {
    /// Resolve the initial snapshot.
    pub fn new(resolver: ConfigResolver, defaults: ResolvedConfig, raw: RawConfig) -> Result<Self, ConfigError> {
        let current = Arc::new(resolver.resolve(raw, &defaults)?);
        Ok(Self {
            resolver,
            defaults,
            current,
            generation: 0,
        })
    }

    /// The snapshot consumers should use now.
    pub fn current(&self) -> Arc<ResolvedConfig> {
        Arc::clone(&self.current)
    }

    /// Number of swaps since creation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn defaults(&self) -> &ResolvedConfig {
        &self.defaults
    }

    /// Resolve `raw` and make it current.
    pub fn reload(&mut self, raw: RawConfig) -> Result<Reload, ConfigError> {
        let next = match self.resolver.resolve(raw, &self.defaults) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(error = %e, generation = self.generation, "reload rejected; keeping current configuration");
                return Err(e);
            }
        };

        if next == *self.current {
            return Ok(Reload::Unchanged);
        }

        self.current = Arc::new(next);
        self.generation += 1;
        tracing::debug!(generation = self.generation, "configuration swapped");
        Ok(Reload::Swapped {
            generation: self.generation,
        })
    }
}
