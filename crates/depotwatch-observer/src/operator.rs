//! Operator REST API handlers for runtime control.
//!
//! Pausing cancels the simulation and chart-feed timers; the clock keeps
//! ticking. Resuming first brings the dashboard up to the real elapsed
//! time, then registers both timers again, so the next tick and feed land
//! one full period after the resume.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/pause` | Pause simulation and chart feed |
//! | `POST` | `/api/operator/resume` | Resume simulation and chart feed |
//! | `GET` | `/api/operator/status` | Pause flag and run counters |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::info;

use crate::error::ObserverError;
use crate::state::AppState;

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

// ---------------------------------------------------------------------------
// POST /api/operator/pause
// ---------------------------------------------------------------------------

/// Pause the simulation and chart feed.
pub async fn pause(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = {
        let mut dashboard = state.dashboard.lock().await;
        dashboard.pause();
        dashboard.snapshot()
    };
    state.broadcast(&snapshot);
    info!("Simulation paused by operator");

    Json(OperatorResponse {
        ok: true,
        message: "Simulation paused".to_owned(),
    })
}

// ---------------------------------------------------------------------------
// POST /api/operator/resume
// ---------------------------------------------------------------------------

/// Resume the simulation and chart feed after a pause.
pub async fn resume(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = {
        let mut dashboard = state.dashboard.lock().await;
        dashboard.resume_at(state.time_base.elapsed())?;
        dashboard.snapshot()
    };
    state.broadcast(&snapshot);
    info!("Simulation resumed by operator");

    Ok(Json(OperatorResponse {
        ok: true,
        message: "Simulation resumed".to_owned(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/operator/status
// ---------------------------------------------------------------------------

/// Return the pause flag, simulated elapsed time, and run counters.
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.lock().await.status())
}
