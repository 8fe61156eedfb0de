//! windcfg CLI
//!
//! Entry point for the `windcfg` command-line tool.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use windcfg::config::{ConfigResolver, EffectiveConfig, Important, ValidationMode};
use windcfg::{load_plugins, PluginRegistry};

/// Config files looked up when `--config` is not given, in order.
const DEFAULT_CONFIG_PATHS: &[&str] = &["windcfg.config.json", "windcfg.config.toml"];

/// Environment variable holding the log filter
const LOG_ENV: &str = "WINDCFG_LOG";

#[derive(Parser)]
#[command(name = "windcfg")]
#[command(about = "Resolve and validate utility-CSS build configuration", version)]
struct Cli {
    /// Log resolution details to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as JSON
    Resolve {
        /// Path to config file (default: windcfg.config.json or .toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Reject unknown keys
        #[arg(long)]
        strict: bool,

        /// Write the effective config to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Validate the configuration and print a summary
    Check {
        /// Path to config file (default: windcfg.config.json or .toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Reject unknown keys
        #[arg(long)]
        strict: bool,

        /// Also require every plugin to be a known first-party plugin
        #[arg(long)]
        plugins: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve {
            config,
            strict,
            output,
        } => run_resolve(config, strict, output),
        Commands::Check {
            config,
            strict,
            plugins,
        } => run_check(config, strict, plugins),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "windcfg=debug" } else { "windcfg=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolver_for(strict: bool) -> ConfigResolver {
    ConfigResolver::new(if strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Loose
    })
}

/// An explicit path must exist; otherwise fall back to the first default
/// path present, or to built-in defaults only.
fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    let found = DEFAULT_CONFIG_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf);
    if found.is_none() {
        tracing::info!("no config file found; using built-in defaults");
    }
    found
}

fn build_effective(config: Option<PathBuf>, strict: bool) -> EffectiveConfig {
    let path = config_path(config);
    match EffectiveConfig::build(path.as_deref(), &resolver_for(strict)) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn run_resolve(config: Option<PathBuf>, strict: bool, output: Option<PathBuf>) {
    let effective = build_effective(config, strict);

    if let Some(path) = output {
        if let Err(e) = effective.write_to_file(&path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
        eprintln!("Wrote: {}", path.display());
        return;
    }

    match effective.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_check(config: Option<PathBuf>, strict: bool, check_plugins: bool) {
    let effective = build_effective(config, strict);
    let resolved = &effective.config;

    if check_plugins {
        if let Err(e) = load_plugins(resolved, &mut PluginRegistry::first_party()) {
            eprintln!("Plugin error: {}", e);
            process::exit(1);
        }
    }

    match effective.sources.iter().find_map(|s| s.path.as_deref()) {
        Some(path) => println!("Configuration valid: {}", path),
        None => println!("Configuration valid: built-in defaults"),
    }
    println!();
    println!("  Dark mode: {}", resolved.dark_mode());
    println!("  Content patterns: {}", resolved.content().len());
    for pattern in resolved.content() {
        println!("    {}", pattern);
    }
    let categories: Vec<&str> = resolved.theme().categories().map(|(name, _)| name).collect();
    println!("  Theme categories: {}", categories.join(", "));
    if resolved.plugins().is_empty() {
        println!("  Plugins: none");
    } else {
        let ids: Vec<&str> = resolved.plugins().iter().map(|p| p.id()).collect();
        println!("  Plugins: {}", ids.join(", "));
    }
    if !resolved.prefix().is_empty() {
        println!("  Prefix: {}", resolved.prefix());
    }
    match resolved.important() {
        Important::Flag(false) => {}
        Important::Flag(true) => println!("  Important: yes"),
        Important::Selector(selector) => println!("  Important: {}", selector),
    }
    if !resolved.safelist().is_empty() {
        println!("  Safelist: {}", resolved.safelist().len());
    }
    if !resolved.blocklist().is_empty() {
        println!("  Blocklist: {}", resolved.blocklist().len());
    }
    println!("  Digest: {}", effective.digest);
}
