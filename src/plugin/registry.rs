//! In-memory plugin registry
//!
//! Knows a fixed set of plugin ids and the option keys each accepts.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::{PluginContext, PluginLoader, PluginResolutionError};
use crate::config::{DarkModeStrategy, PluginReference};

/// A plugin the registry can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub id: String,
    /// Accepted option keys; empty means the plugin takes no options.
    pub option_keys: Vec<String>,
}

impl PluginDescriptor {
    pub fn new(id: impl Into<String>, option_keys: &[&str]) -> Self {
        Self {
            id: id.into(),
            option_keys: option_keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// A plugin ready for the class generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedPlugin {
    pub id: String,
    pub options: Map<String, Value>,
    pub dark_mode: DarkModeStrategy,
    pub index: usize,
}

/// Loader backed by a table of known plugins.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, PluginDescriptor>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The official first-party plugins.
    pub fn first_party() -> Self {
        Self::new()
            .with(PluginDescriptor::new("@tailwindcss/typography", &["className", "target"]))
            .with(PluginDescriptor::new("@tailwindcss/forms", &["strategy"]))
            .with(PluginDescriptor::new("@tailwindcss/aspect-ratio", &[]))
            .with(PluginDescriptor::new("@tailwindcss/container-queries", &[]))
    }

    pub fn with(mut self, descriptor: PluginDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn register(&mut self, descriptor: PluginDescriptor) {
        self.plugins.insert(descriptor.id.clone(), descriptor);
    }

    pub fn get(&self, id: &str) -> Option<&PluginDescriptor> {
        self.plugins.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }
}

impl PluginLoader for PluginRegistry {
    type Plugin = LoadedPlugin;

    fn load(
        &mut self,
        reference: &PluginReference,
        context: &PluginContext<'_>,
    ) -> Result<LoadedPlugin, PluginResolutionError> {
        let id = reference.id();
        let descriptor = self
            .get(id)
            .ok_or_else(|| PluginResolutionError::new(id, "not registered"))?;

        let options = reference.options().cloned().unwrap_or_default();
        if let Some(key) = options
            .keys()
            .find(|key| !descriptor.option_keys.contains(*key))
        {
            return Err(PluginResolutionError::new(
                id,
                format!("unsupported option '{}'", key),
            ));
        }

        Ok(LoadedPlugin {
            id: id.to_string(),
            options,
            dark_mode: context.dark_mode.clone(),
            index: context.index,
        })
    }
}
