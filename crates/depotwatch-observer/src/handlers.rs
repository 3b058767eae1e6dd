//! REST API endpoint handlers for the dashboard server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Dashboard page |
//! | `GET` | `/api/dashboard` | Full dashboard snapshot |
//! | `GET` | `/api/log` | Rendered event log rows, newest first |
//! | `GET` | `/api/charts` | Both rolling charts |
//! | `GET` | `/api/briefing` | Briefing panel state |
//! | `POST` | `/api/briefing` | Request a shift-manager briefing |
//! | `POST` | `/api/anomaly-review` | Request an event log review |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use depotwatch_briefing::BriefingOutcome;
use depotwatch_types::BriefingPanel;
use tracing::info;

use crate::error::ObserverError;
use crate::page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response body for the briefing trigger endpoints.
#[derive(Debug, serde::Serialize)]
pub struct BriefingResponse {
    /// How the request ended (`answered`, `failed`, `not_enough_data`).
    pub outcome: &'static str,
    /// Panel state after the request completed.
    pub panel: BriefingPanel,
}

// ---------------------------------------------------------------------------
// GET / -- dashboard page
// ---------------------------------------------------------------------------

/// Serve the dashboard page.
///
/// The slots are rendered with their current values; the embedded script
/// then keeps everything live over `/ws/dashboard`.
pub async fn index(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let display = state.dashboard.lock().await.display().clone();
    Ok(Html(page::render_index(&display)?))
}

// ---------------------------------------------------------------------------
// GET /api/dashboard, /api/log, /api/charts
// ---------------------------------------------------------------------------

/// Return the full dashboard snapshot.
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.lock().await.snapshot())
}

/// Return the rendered event log, newest first.
pub async fn get_log(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rows = state.dashboard.lock().await.log().render();
    Json(serde_json::json!({
        "count": rows.len(),
        "rows": rows,
    }))
}

/// Return both rolling charts.
pub async fn get_charts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dashboard = state.dashboard.lock().await;
    Json(serde_json::json!({
        "goods": dashboard.goods_chart().render(),
        "vehicles": dashboard.vehicles_chart().render(),
    }))
}

// ---------------------------------------------------------------------------
// Briefing panel
// ---------------------------------------------------------------------------

/// Return the briefing panel state.
pub async fn get_briefing(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.briefing.panel())
}

/// Request a shift-manager briefing over the current chart series.
///
/// Responds once the request has completed. Returns 409 if another
/// briefing is already in flight.
pub async fn post_briefing(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let (goods, vehicles) = state.dashboard.lock().await.chart_values();

    let outcome = state.briefing.request_briefing(&goods, &vehicles).await;
    respond(&state, &outcome)
}

/// Request a review of the current event log.
///
/// Responds once the request has completed. An empty log answers
/// immediately with `not_enough_data`. Returns 409 if another briefing is
/// already in flight.
pub async fn post_anomaly_review(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let lines = state.dashboard.lock().await.log_text();

    let outcome = state.briefing.request_anomaly_review(&lines).await;
    respond(&state, &outcome)
}

fn respond(state: &AppState, outcome: &BriefingOutcome) -> Result<Json<BriefingResponse>, ObserverError> {
    if *outcome == BriefingOutcome::Busy {
        return Err(ObserverError::Busy);
    }
    info!(outcome = outcome.label(), "Briefing request completed");
    Ok(Json(BriefingResponse {
        outcome: outcome.label(),
        panel: state.briefing.panel(),
    }))
}
