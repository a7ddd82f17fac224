//! API server implementation

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use super::routes::router;
use crate::AppState;

/// HTTP server for the relay
pub struct ApiServer {
    state: AppState,
    port: u16,
}

impl ApiServer {
    /// Create a new API server with the given state and port
    pub fn new(state: AppState, port: u16) -> Self {
        ApiServer { state, port }
    }

    /// Bind and serve until Ctrl+C
    pub async fn start(self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind API server to {}", addr))?;

        info!("Relay server listening on http://localhost:{}", self.port);

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("API server error")?;

        info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}
