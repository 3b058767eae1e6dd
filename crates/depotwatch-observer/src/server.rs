//! Dashboard HTTP server lifecycle management.
//!
//! [`bind`] resolves and binds the listen address; [`serve`] runs the
//! Axum server on a bound listener until the process is terminated.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the dashboard server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on. 0 picks an ephemeral port.
    pub port: u16,
}

impl From<&depotwatch_core::config::ObserverConfig> for ServerConfig {
    fn from(config: &depotwatch_core::config::ObserverConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// Bind a TCP listener on the configured address.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is invalid or in use.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))
}

/// Serve the dashboard on an already bound listener.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] if the server hits a fatal I/O error.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    let router = build_router(state);

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Dashboard server listening");
    }

    axum::serve(listener, router)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
}

/// Errors that can occur when starting or running the dashboard server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
