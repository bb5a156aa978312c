//! pmtrack - Factory PM maintenance terminal
//!
//! Wires together configuration, the JSON store, the equipment catalog,
//! and the policy engine, then runs the interactive shell on stdio.

use anyhow::{Context, Result};
use clap::Parser;
use pmtrack_catalog::Catalog;
use pmtrack_cli::{Console, Shell};
use pmtrack_config::{AppConfig, load_config};
use pmtrack_core::PolicyEngine;
use pmtrack_store::{JsonStore, Store};
use pmtrack_util::{default_config_path, now};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// pmtrack - Preventive maintenance tracking for a single factory site
#[derive(Parser, Debug)]
#[command(name = "pmtrack")]
#[command(about = "Preventive maintenance tracking terminal", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/pmtrack/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set PMTRACK_DATA_DIR env var)
    #[arg(short, long, env = "PMTRACK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "pmtrack starting");

    if pmtrack_util::is_mock_time_active() {
        warn!("Mock time is active (PMTRACK_MOCK_TIME)");
    }

    // Load configuration; a missing file falls back to built-in defaults so
    // a fresh install can run before anyone writes a config
    let config = if args.config.exists() {
        load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?
    } else {
        warn!(path = %args.config.display(), "No config file, using defaults");
        pmtrack_config::parse_config("config_version = 1")?
    };

    info!(
        config_path = %args.config.display(),
        operators = config.operators.len(),
        "Configuration loaded"
    );

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| config.site.data_dir.clone());

    // Initialize store
    let store: Arc<dyn Store> = Arc::new(
        JsonStore::open(&data_dir)
            .with_context(|| format!("Failed to open data directory {:?}", data_dir))?,
    );
    info!(data_dir = %data_dir.display(), "Store initialized");

    // Load the equipment catalog; missing files leave zones empty
    let catalog = Arc::new(Catalog::load(&config.catalog));

    // Initialize the engine and clear out last week's records
    let mut engine = PolicyEngine::new(store, catalog, config.settings_defaults);
    let dropped = engine.apply_retention_policy(now())?;
    if dropped > 0 {
        println!("Old PM records cleared (older than current calendar week).");
    }

    run_shell(&mut engine, &config)
}

fn run_shell(engine: &mut PolicyEngine, config: &AppConfig) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());

    Shell::new(engine, config, console).run()
}
