//! Error types for the dashboard server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the dashboard API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// A briefing was requested while another is in flight.
    #[error("a briefing request is already in flight")]
    Busy,

    /// The dashboard rejected an operator command.
    #[error("dashboard error: {0}")]
    Dashboard(#[from] depotwatch_core::DashboardError),

    /// The dashboard page failed to render.
    #[error("template error: {0}")]
    Template(String),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Busy => StatusCode::CONFLICT,
            Self::Dashboard(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
