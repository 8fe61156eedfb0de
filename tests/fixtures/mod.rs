//! Test fixtures
//!
//! This module provides:
//! - A site project config in JSON and TOML form
//! - A corpus of documents with their expected resolution outcome

use std::path::{Path, PathBuf};

/// Directory of the site fixture
pub fn site_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site")
}

/// Path to the JSON site config
pub fn site_json_path() -> PathBuf {
    site_dir().join("windcfg.config.json")
}

/// Path to the TOML site config
pub fn site_toml_path() -> PathBuf {
    site_dir().join("windcfg.config.toml")
}

/// Path to the validation corpus
pub fn validation_corpus_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/validation_corpus.json")
}

/// Validation test case from validation_corpus.json
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ValidationCase {
    pub id: String,
    pub description: String,
    pub document: serde_json::Value,
    #[serde(default)]
    pub strict: bool,
    pub expected: ValidationExpectation,
}

/// Expected resolution outcome
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ValidationExpectation {
    pub ok: bool,
    /// "shape" or "domain" when `ok` is false
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

/// Full validation corpus
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ValidationCorpus {
    pub schema_version: u32,
    pub cases: Vec<ValidationCase>,
}

impl ValidationCorpus {
    /// Load corpus from the fixture file
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(validation_corpus_path())?;
        let corpus: ValidationCorpus = serde_json::from_str(&content)?;
        Ok(corpus)
    }
}
