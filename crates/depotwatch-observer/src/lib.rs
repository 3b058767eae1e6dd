//! Dashboard server for the Depotwatch yard monitor.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Dashboard page** (`GET /`) with the display slots, event log, two
//!   rolling charts, and the briefing panel
//! - **`WebSocket` endpoint** (`/ws/dashboard`) pushing a fresh
//!   [`DashboardSnapshot`] after every batch of timer jobs via
//!   [`tokio::sync::broadcast`]
//! - **REST endpoints** for reading the dashboard, log, charts, and
//!   briefing panel, and for triggering briefings
//! - **Operator endpoints** to pause and resume the simulation
//!
//! # Architecture
//!
//! Handlers share the engine's [`Dashboard`](depotwatch_core::Dashboard)
//! behind a mutex. Reads lock it only long enough to render a snapshot.
//! Briefing handlers copy what they need out of the dashboard and release
//! the lock before calling the text-generation API, so timers keep firing
//! while a request is in flight.
//!
//! [`DashboardSnapshot`]: depotwatch_types::DashboardSnapshot

pub mod error;
pub mod handlers;
pub mod operator;
pub mod page;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerConfig, ServerError};
pub use startup::{ObserverHandle, spawn_observer};
pub use state::AppState;
