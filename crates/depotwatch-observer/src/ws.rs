//! `WebSocket` handler for live dashboard updates.
//!
//! Clients connect to `GET /ws/dashboard`, receive the current snapshot
//! straight away, then a JSON-encoded [`DashboardSnapshot`] each time
//! the engine dispatches a batch of timer jobs or the operator pauses or
//! resumes.
//!
//! If a client falls behind, lagged messages are skipped and the client
//! resumes from the newest snapshot.
//!
//! [`DashboardSnapshot`]: depotwatch_types::DashboardSnapshot

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use depotwatch_types::DashboardSnapshot;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming dashboard snapshots.
///
/// # Route
///
/// `GET /ws/dashboard`
pub async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Send one snapshot as a text frame. Returns `false` once the client
/// is gone.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &DashboardSnapshot) -> bool {
    let json = match serde_json::to_string(snapshot) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize dashboard snapshot: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Subscribe to the broadcast channel and forward each snapshot.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before rendering so no update falls between the two.
    let mut rx = state.subscribe();
    let initial = state.dashboard.lock().await.snapshot();
    if !send_snapshot(&mut socket, &initial).await {
        debug!("WebSocket client disconnected (initial send failed)");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        if !send_snapshot(&mut socket, &snapshot).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
