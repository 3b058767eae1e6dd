//! Server startup helper for embedding in the engine binary.
//!
//! [`spawn_observer`] binds the listen address up front, so a port
//! conflict fails startup, and then serves on a background Tokio task
//! alongside the dashboard runner.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the dashboard server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A running dashboard server.
pub struct ObserverHandle {
    /// The address actually bound (resolves port 0).
    pub addr: SocketAddr,
    /// The background serve task. Abort it on shutdown.
    pub task: JoinHandle<()>,
}

/// Bind the dashboard server and serve it on a background task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be bound.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<ObserverHandle, StartupError> {
    let listener = server::bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("failed to read bound address: {e}")))?;

    let task = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state).await {
            tracing::error!(error = %e, "Dashboard server exited with error");
        }
    });

    tracing::info!(%addr, "Dashboard server spawned on background task");

    Ok(ObserverHandle { addr, task })
}
