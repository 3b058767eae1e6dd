//! Shared application state for the dashboard server.
//!
//! [`AppState`] holds the live dashboard, the time base the runner drives
//! it by, the briefing client, and the broadcast channel that pushes snapshots to `WebSocket` clients.

use std::sync::Arc;

use depotwatch_briefing::BriefingClient;
use depotwatch_core::Dashboard;
use depotwatch_core::runner::TimeBase;
use depotwatch_types::DashboardSnapshot;
use tokio::sync::{Mutex, broadcast};

/// Capacity of the broadcast channel for dashboard snapshots.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 64;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The live dashboard, also driven by the engine's runner.
    pub dashboard: Arc<Mutex<Dashboard>>,
    /// Real-time anchor shared with the runner.
    pub time_base: TimeBase,
    /// Briefing client and its panel state.
    pub briefing: Arc<BriefingClient>,
    /// Broadcast sender for dashboard snapshots.
    pub tx: broadcast::Sender<DashboardSnapshot>,
}

impl AppState {
    /// Create application state around an existing dashboard.
    pub fn new(
        dashboard: Arc<Mutex<Dashboard>>,
        time_base: TimeBase,
        briefing: Arc<BriefingClient>,
    ) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            dashboard,
            time_base,
            briefing,
            tx,
        }
    }

    /// Subscribe to the snapshot broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardSnapshot> {
        self.tx.subscribe()
    }

    /// Publish a snapshot to all connected clients.
    ///
    /// Returns the number of receivers that got the message, 0 when no
    /// clients are connected.
    pub fn broadcast(&self, snapshot: &DashboardSnapshot) -> usize {
        // send only fails when there are no receivers.
        self.tx.send(snapshot.clone()).unwrap_or(0)
    }

    /// Render the current dashboard and publish it.
    pub async fn publish_current(&self) -> usize {
        let snapshot = self.dashboard.lock().await.snapshot();
        self.broadcast(&snapshot)
    }
}
