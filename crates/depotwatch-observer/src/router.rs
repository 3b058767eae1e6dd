//! Axum router construction for the dashboard server.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the dashboard server.
///
/// The router includes:
/// - `GET /` -- dashboard page
/// - `GET /ws/dashboard` -- `WebSocket` snapshot stream
/// - `GET /api/dashboard` -- full snapshot
/// - `GET /api/log` -- event log rows
/// - `GET /api/charts` -- both rolling charts
/// - `GET|POST /api/briefing` -- panel state / request a briefing
/// - `POST /api/anomaly-review` -- request an event log review
/// - `POST /api/operator/pause`, `POST /api/operator/resume`
/// - `GET /api/operator/status`
///
/// CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/dashboard", get(ws::ws_dashboard))
        // REST API
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/log", get(handlers::get_log))
        .route("/api/charts", get(handlers::get_charts))
        .route(
            "/api/briefing",
            get(handlers::get_briefing).post(handlers::post_briefing),
        )
        .route("/api/anomaly-review", post(handlers::post_anomaly_review))
        // Operator API
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/resume", post(operator::resume))
        .route("/api/operator/status", get(operator::status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
