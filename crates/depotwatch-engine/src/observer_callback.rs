//! Dispatch callback that pushes dashboard snapshots to the server.
//!
//! After each batch of timer jobs, this callback renders a
//! [`DashboardSnapshot`](depotwatch_types::DashboardSnapshot) and
//! broadcasts it to all connected `WebSocket` clients.

use std::sync::Arc;

use depotwatch_core::Dashboard;
use depotwatch_core::runner::DispatchCallback;
use depotwatch_core::scheduler::Fired;
use depotwatch_observer::state::AppState;
use tracing::trace;

/// Callback that bridges the dashboard runner to the HTTP server.
pub struct ObserverCallback {
    state: Arc<AppState>,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl DispatchCallback for ObserverCallback {
    fn on_dispatch(&mut self, fired: &[Fired], dashboard: &Dashboard) {
        let receivers = self.state.broadcast(&dashboard.snapshot());
        trace!(jobs = fired.len(), receivers, "Dashboard snapshot broadcast");
    }
}
