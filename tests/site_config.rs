//! Site project config tests
//!
//! Loads the site fixture from disk in both formats and feeds it to the
//! downstream consumers.

mod fixtures;

use std::sync::Arc;

use windcfg::config::{ConfigOrigin, Reload};
use windcfg::{
    load_plugins, ConfigResolver, DarkModeStrategy, EffectiveConfig, LiveConfig, PluginRegistry,
    RawConfig, ResolvedConfig,
};

fn load(path: std::path::PathBuf) -> ResolvedConfig {
    let raw = RawConfig::from_file(&path).expect("fixture loads");
    ConfigResolver::strict()
        .resolve(raw, &ResolvedConfig::builtin())
        .expect("fixture resolves")
}

#[test]
fn test_json_and_toml_agree() {
    let from_json = load(fixtures::site_json_path());
    let from_toml = load(fixtures::site_toml_path());
    assert_eq!(from_json, from_toml);
    assert_eq!(from_json.digest().unwrap(), from_toml.digest().unwrap());
}

#[test]
fn test_site_config_contents() {
    let config = load(fixtures::site_json_path());

    assert_eq!(config.dark_mode(), &DarkModeStrategy::SelectorBased(".dark".into()));
    let globs: Vec<&str> = config.content().iter().map(|p| p.glob()).collect();
    assert_eq!(
        globs,
        vec!["index.html", "./_includes/**/*.{html,js}", "./_layouts/**/*.{html,js}"]
    );
    assert_eq!(config.theme(), ResolvedConfig::builtin().theme());
}

#[test]
fn test_site_plugins_load_from_registry() {
    let config = load(fixtures::site_json_path());
    let plugins = load_plugins(&config, &mut PluginRegistry::first_party()).unwrap();

    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].id, "@tailwindcss/typography");
    assert_eq!(plugins[0].dark_mode, DarkModeStrategy::SelectorBased(".dark".into()));
}

#[test]
fn test_effective_config_provenance() {
    let path = fixtures::site_toml_path();
    let effective = EffectiveConfig::build(Some(&path), &ConfigResolver::strict()).unwrap();

    assert_eq!(effective.sources.len(), 2);
    assert_eq!(effective.sources[1].origin, ConfigOrigin::File);
    assert_eq!(
        effective.sources[1].path.as_deref(),
        Some(&*path.to_string_lossy())
    );
    assert_eq!(effective.digest, effective.config.digest().unwrap());
}

#[test]
fn test_watch_reload_from_edited_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("windcfg.config.json");
    std::fs::copy(fixtures::site_json_path(), &path).unwrap();

    let mut live = LiveConfig::new(
        ConfigResolver::strict(),
        ResolvedConfig::builtin(),
        RawConfig::from_file(&path).unwrap(),
    )
    .unwrap();
    let in_flight: Arc<ResolvedConfig> = live.current();

    std::fs::write(
        &path,
        r#"{"darkMode": "media", "content": ["index.html"], "plugins": []}"#,
    )
    .unwrap();
    let outcome = live.reload(RawConfig::from_file(&path).unwrap()).unwrap();

    assert_eq!(outcome, Reload::Swapped { generation: 1 });
    assert_eq!(in_flight.plugins().len(), 1);
    assert_eq!(live.current().dark_mode(), &DarkModeStrategy::MediaQuery);
    assert!(live.current().plugins().is_empty());
}
