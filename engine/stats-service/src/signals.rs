//! Signal handling for graceful shutdown

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Setup signal handlers for graceful shutdown.
///
/// The returned receiver resolves on the first Ctrl+C or SIGTERM.
pub fn setup_signal_handlers() -> Result<oneshot::Receiver<()>> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let sigterm = Arc::new(AtomicBool::new(false));

    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGTERM, sigterm.clone())?;

    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Ctrl+C signal received");
        };

        tokio::select! {
            _ = ctrl_c => {}
            _ = wait_for_flag(sigterm) => info!("SIGTERM signal received"),
        }

        let _ = shutdown_tx.send(());
    });

    Ok(shutdown_rx)
}

async fn wait_for_flag(flag: Arc<AtomicBool>) {
    while !flag.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Wait for the server task to drain, giving up after `shutdown_timeout`
pub async fn graceful_shutdown(server: JoinHandle<()>, shutdown_timeout: Duration) -> Result<()> {
    info!("Starting graceful shutdown...");

    match timeout(shutdown_timeout, server).await {
        Ok(Ok(())) => {
            info!("HTTP server stopped gracefully");
        }
        Ok(Err(e)) => {
            error!("HTTP server task failed: {}", e);
        }
        Err(_) => {
            warn!("HTTP server did not stop within {:?}, forcing shutdown", shutdown_timeout);
        }
    }

    info!("Graceful shutdown complete");
    Ok(())
}
