//! Service lifecycle: bind, serve, drain

use anyhow::{Context, Result};
use stats_store::SymbolStore;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServiceConfig;
use crate::routes::create_routes;
use crate::signals::graceful_shutdown;

/// A bound, running HTTP server
pub struct RunningServer {
    pub addr: SocketAddr,
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RunningServer {
    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self, shutdown_timeout: Duration) -> Result<()> {
        let _ = self.stop_tx.send(());
        graceful_shutdown(self.handle, shutdown_timeout).await
    }
}

/// Bind the routes on `addr` and serve them on a background task
pub fn start_server(addr: SocketAddr, store: Arc<SymbolStore>) -> Result<RunningServer> {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let (addr, server) = warp::serve(create_routes(store))
        .try_bind_with_graceful_shutdown(addr, async move {
            let _ = stop_rx.await;
        })
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Stats service listening on http://{}", addr);
    Ok(RunningServer { addr, stop_tx, handle: tokio::spawn(server) })
}

/// Run until `shutdown` resolves, then drain within the configured timeout
pub async fn run_service(
    config: &ServiceConfig,
    store: Arc<SymbolStore>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let server = start_server(config.server.socket_addr()?, store)?;

    shutdown.await;
    info!("Shutdown signal received. Initiating graceful shutdown...");

    server.stop(Duration::from_secs(config.server.shutdown_timeout_secs)).await
}
