//! Stats Service
//!
//! Entry point: loads configuration, creates the symbol store and serves it over HTTP
//! until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use stats_store::SymbolStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use stats_service::{
    initialize_logging, load_config, run_service, setup_signal_handlers, validate_config,
};

#[derive(Parser, Debug)]
#[command(name = "stats-service", version, about = "Per-symbol price statistics over HTTP")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    validate_config(&config)?;

    initialize_logging(&config.logging)?;
    info!("Starting Stats Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Limits: {} symbols, {} values per batch, {} chars per symbol",
        config.store.max_symbols, config.store.max_batch_size, config.store.max_symbol_length
    );

    let store = Arc::new(SymbolStore::new(config.store).context("Failed to create symbol store")?);

    let shutdown_signal = setup_signal_handlers()?;
    run_service(&config, store, async move {
        let _ = shutdown_signal.await;
    })
    .await?;

    info!("Stats Service shutdown complete");
    Ok(())
}
