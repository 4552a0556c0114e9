//! QueryDeck - A desktop browser and query tool for SQLite database files
//!
//! Opens a database file, lists its tables, and runs SQL typed by the
//! user, rendering query results in a grid.

mod config;
mod session;
mod shared;
mod ui;

use anyhow::Result;
use clap::Parser;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::shared::SharedAppState;

/// QueryDeck - Browse and query SQLite database files
#[derive(Parser, Debug)]
#[command(name = "querydeck")]
#[command(about = "A desktop browser and query tool for SQLite database files")]
struct Args {
    /// Database file to open at startup
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("QueryDeck starting...");

    // Load or create configuration
    let config = load_or_create_config();

    // Create shared state
    let shared_state = Arc::new(RwLock::new(SharedAppState::new(config)));

    // Run the workbench (blocking)
    if let Err(e) = ui::app::run_workbench(shared_state, args.database) {
        tracing::error!("Workbench error: {}", e);
    }

    info!("QueryDeck shutdown complete");

    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config() -> AppConfig {
    if let Ok(config_dir) = config::config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
