//! Plugin loading contract
//!
//! The resolver only records plugin references. Turning them into plugins is
//! the job of a [`PluginLoader`]; [`load_plugins`] drives one over a resolved
//! config in order and stops at the first failure.

mod registry;

pub use registry::{LoadedPlugin, PluginDescriptor, PluginRegistry};

use crate::config::{DarkModeStrategy, PluginReference, ResolvedConfig};

/// A plugin reference the loader could not turn into a plugin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("plugin '{plugin}' could not be resolved: {reason}")]
pub struct PluginResolutionError {
    pub plugin: String,
    pub reason: String,
}

impl PluginResolutionError {
    pub fn new(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }
}

/// Shared context handed to every plugin.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext<'a> {
    pub dark_mode: &'a DarkModeStrategy,
    pub prefix: &'a str,
    /// Position in the plugin list; later plugins may override earlier ones.
    pub index: usize,
}

/// Turns plugin references into plugins.
pub trait PluginLoader {
    type Plugin;

    fn load(
        &mut self,
        reference: &PluginReference,
        context: &PluginContext<'_>,
    ) -> Result<Self::Plugin, PluginResolutionError>;
}

/// Load every plugin of `config`, in order.
///
/// The first loader error is returned as-is.
pub fn load_plugins<L: PluginLoader>(
    config: &ResolvedConfig,
    loader: &mut L,
) -> Result<Vec<L::Plugin>, PluginResolutionError> {
    config
        .plugins()
        .iter()
        .enumerate()
        .map(|(index, reference)| {
            let context = PluginContext {
                dark_mode: config.dark_mode(),
                prefix: config.prefix(),
                index,
            };
            tracing::debug!(plugin = reference.id(), index, "loading plugin");
            loader.load(reference, &context)
        })
        .collect()
}
