//! Real-time driver for the dashboard.
//!
//! [`run_dashboard`] maps the dashboard's virtual timeline onto wall
//! time: it sleeps until the next job is due, locks the dashboard,
//! advances it to the real elapsed time and hands the fired jobs to a
//! [`DispatchCallback`]. Jobs run one at a time under the lock, so
//! handlers never interleave. Pending text-generation calls do not hold
//! the lock and never delay timers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::dashboard::{Dashboard, DashboardError};
use crate::scheduler::Fired;

/// Errors that can stop the runner.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A dispatched job failed.
    #[error("dashboard error: {source}")]
    Dashboard {
        /// The underlying dashboard error.
        #[from]
        source: DashboardError,
    },
}

/// Totals reported when the runner stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of jobs dispatched.
    pub jobs_dispatched: u64,
}

/// Anchors the dashboard's virtual timeline to the monotonic clock.
///
/// The runner and any handler that re-arms timers share one base so they
/// agree on what "now" is.
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    origin: Instant,
    offset: Duration,
}

impl TimeBase {
    /// A base whose virtual time reads `offset` at this instant.
    pub fn starting_at(offset: Duration) -> Self {
        Self {
            origin: Instant::now(),
            offset,
        }
    }

    /// Virtual time that corresponds to the current instant.
    pub fn elapsed(&self) -> Duration {
        self.offset.saturating_add(self.origin.elapsed())
    }

    fn deadline(&self, due: Duration) -> Instant {
        self.origin
            .checked_add(due.saturating_sub(self.offset))
            .unwrap_or(self.origin)
    }
}

/// Invoked after every batch of jobs the runner dispatches.
///
/// Implementations typically publish a fresh snapshot to connected views.
pub trait DispatchCallback: Send {
    /// Called with the jobs that just ran and the dashboard they ran on.
    fn on_dispatch(&mut self, fired: &[Fired], dashboard: &Dashboard);
}

/// A callback that ignores every dispatch.
pub struct NoOpCallback;

impl DispatchCallback for NoOpCallback {
    fn on_dispatch(&mut self, _fired: &[Fired], _dashboard: &Dashboard) {}
}

/// Drive the dashboard in real time until `shutdown` flips to `true`.
///
/// The dashboard must already be started and `time_base` must read the
/// dashboard's elapsed time at the moment it was created. If no timer is
/// pending the runner simply waits for shutdown.
///
/// # Errors
///
/// Returns [`RunnerError`] if a dispatched job fails.
pub async fn run_dashboard<C: DispatchCallback>(
    dashboard: Arc<Mutex<Dashboard>>,
    time_base: TimeBase,
    mut callback: C,
    mut shutdown: watch::Receiver<bool>,
) -> Result<RunSummary, RunnerError> {
    let mut summary = RunSummary::default();

    info!("Dashboard runner started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let next_due = dashboard.lock().await.next_due();
        let Some(next_due) = next_due else {
            warn!("No timers registered, waiting for shutdown");
            if shutdown.changed().await.is_err() {
                break;
            }
            continue;
        };

        let deadline = time_base.deadline(next_due);

        tokio::select! {
            () = tokio::time::sleep_until(deadline) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        }

        let mut guard = dashboard.lock().await;
        let now = time_base.elapsed();
        let fired = guard.advance_to(now)?;
        if !fired.is_empty() {
            summary.jobs_dispatched = summary
                .jobs_dispatched
                .saturating_add(u64::try_from(fired.len()).unwrap_or(u64::MAX));
            callback.on_dispatch(&fired, &guard);
        }
    }

    info!(
        jobs_dispatched = summary.jobs_dispatched,
        "Dashboard runner stopped"
    );
    Ok(summary)
}
