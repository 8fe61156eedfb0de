//! Effective configuration with provenance
//!
//! The effective config captures the resolved settings plus where they came
//! from, for build logs and `windcfg resolve` output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use super::error::ConfigError;
use super::raw::{RawConfig, SourceFormat, ValidationMode};
use super::resolved::ResolvedConfig;
use super::resolver::ConfigResolver;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "windcfg/effective_config@1";

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Inline,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/inline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/inline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Resolved configuration with provenance
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub schema_version: u32,
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// Unknown-key handling used for resolution
    pub mode: ValidationMode,

    /// Canonical digest of `config`
    pub digest: String,

    pub config: ResolvedConfig,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Resolve the file at `path` (if any) over the built-in defaults.
    pub fn build(path: Option<&Path>, resolver: &ConfigResolver) -> Result<Self, ConfigError> {
        let defaults = ResolvedConfig::builtin();
        let mut sources = vec![builtin_source()];

        let config = match path {
            Some(path) => {
                let (raw, digest) = Self::load_file(path)?;
                sources.push(ConfigSource {
                    origin: ConfigOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
                resolver.resolve(raw, &defaults)?
            }
            None => defaults,
        };

        Self::assemble(config, resolver.mode(), sources)
    }

    /// Resolve an in-memory document over the built-in defaults.
    pub fn from_raw(raw: RawConfig, resolver: &ConfigResolver) -> Result<Self, ConfigError> {
        let config = resolver.resolve(raw, &ResolvedConfig::builtin())?;
        let sources = vec![
            builtin_source(),
            ConfigSource {
                origin: ConfigOrigin::Inline,
                path: None,
                digest: None,
            },
        ];
        Self::assemble(config, resolver.mode(), sources)
    }

    fn assemble(config: ResolvedConfig, mode: ValidationMode, sources: Vec<ConfigSource>) -> Result<Self, ConfigError> {
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            mode,
            digest: config.digest()?,
            config,
            sources,
        })
    }

    /// Load and parse a document, returning it with the digest of its bytes
    fn load_file(path: &Path) -> Result<(RawConfig, String), ConfigError> {
        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let raw = RawConfig::from_bytes(&bytes, SourceFormat::from_path(path))?;
        Ok((raw, digest))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }
}

fn builtin_source() -> ConfigSource {
    ConfigSource {
        origin: ConfigOrigin::Builtin,
        path: None,
        digest: None,
    }
}
