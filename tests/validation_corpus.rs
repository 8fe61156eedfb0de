//! Validation corpus tests
//!
//! Runs every document in tests/fixtures/validation_corpus.json through the
//! resolver and compares the outcome.

mod fixtures;

use fixtures::ValidationCorpus;
use windcfg::config::ConfigError;
use windcfg::{ConfigResolver, RawConfig, ResolvedConfig};

#[test]
fn test_validation_corpus() {
    let corpus = ValidationCorpus::load().expect("Failed to load corpus");
    assert_eq!(corpus.schema_version, 1);

    let defaults = ResolvedConfig::builtin();
    let mut failures = Vec::new();

    for case in &corpus.cases {
        let resolver = if case.strict {
            ConfigResolver::strict()
        } else {
            ConfigResolver::loose()
        };
        let result = resolver.resolve(RawConfig::from_value(case.document.clone()), &defaults);

        let outcome = match (&result, case.expected.ok) {
            (Ok(_), true) => Ok(()),
            (Ok(_), false) => Err("resolved but a failure was expected".to_string()),
            (Err(e), true) => Err(format!("unexpected error: {}", e)),
            (Err(e), false) => {
                let kind = match e {
                    ConfigError::Shape { .. } => "shape",
                    ConfigError::Domain { .. } => "domain",
                    _ => "other",
                };
                if Some(kind) != case.expected.kind.as_deref() {
                    Err(format!("expected {:?} error, got {}", case.expected.kind, e))
                } else if e.field() != case.expected.field.as_deref() {
                    Err(format!("expected field {:?}, got {}", case.expected.field, e))
                } else {
                    Ok(())
                }
            }
        };

        if let Err(msg) = outcome {
            failures.push(format!("{} ({}): {}", case.id, case.description, msg));
        }
    }

    assert!(failures.is_empty(), "corpus failures:\n{}", failures.join("\n"));
}

#[test]
fn test_corpus_covers_both_kinds() {
    let corpus = ValidationCorpus::load().expect("Failed to load corpus");
    let kinds: Vec<&str> = corpus
        .cases
        .iter()
        .filter_map(|c| c.expected.kind.as_deref())
        .collect();
    assert!(kinds.contains(&"shape"));
    assert!(kinds.contains(&"domain"));
}
