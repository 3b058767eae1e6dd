//! The briefing state machine: idle -> busy -> idle.
//!
//! [`BriefingClient`] owns the output panel shown next to the two trigger
//! buttons. While a request is in flight the loading indicator is on and
//! both buttons are disabled. A [`BusyGuard`] restores the idle state
//! when it is dropped, so the panel recovers on every exit path: a
//! response, an error, or the request future being dropped mid-flight.
//!
//! A second request while one is in flight is refused without touching
//! the network.

use std::sync::{Mutex, MutexGuard, PoisonError};

use depotwatch_types::{BriefingKind, BriefingPanel};
use tracing::{info, warn};

use crate::error::BriefingError;
use crate::llm::GeminiBackend;
use crate::prompt::PromptEngine;

/// Shown in place of generated text when anything goes wrong.
pub const APOLOGY: &str = "Sorry, there was an error talking to the AI.";

/// Shown when an anomaly review is requested before any event was logged.
pub const NOT_ENOUGH_DATA: &str = "Not enough data yet. Let the simulation run for a bit.";

/// How a briefing request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BriefingOutcome {
    /// The API returned text, now shown in the panel.
    Answered(String),
    /// The request failed; the apology is shown.
    Failed,
    /// The log was empty; no request was made.
    NotEnoughData,
    /// Another request was in flight; nothing changed.
    Busy,
}

impl BriefingOutcome {
    /// Short label for logs and JSON responses.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Answered(_) => "answered",
            Self::Failed => "failed",
            Self::NotEnoughData => "not_enough_data",
            Self::Busy => "busy",
        }
    }
}

/// Sends dashboard summaries for text generation and tracks the panel.
pub struct BriefingClient {
    backend: GeminiBackend,
    prompts: PromptEngine,
    panel: Mutex<BriefingPanel>,
}

impl BriefingClient {
    /// Create a client with an idle panel.
    pub fn new(backend: GeminiBackend, prompts: PromptEngine) -> Self {
        Self {
            backend,
            prompts,
            panel: Mutex::new(BriefingPanel::default()),
        }
    }

    /// Current panel state.
    pub fn panel(&self) -> BriefingPanel {
        lock(&self.panel).clone()
    }

    /// Ask for a shift-manager summary of the two chart series.
    pub async fn request_briefing(&self, goods: &[u64], vehicles: &[u64]) -> BriefingOutcome {
        let kind = BriefingKind::Briefing;
        let Some(guard) = self.acquire(kind) else {
            return BriefingOutcome::Busy;
        };
        let prompt = self.prompts.briefing(goods, vehicles);
        self.ask(guard, kind, prompt).await
    }

    /// Ask for a review of the event log. An empty log is answered with
    /// [`NOT_ENOUGH_DATA`] without a request, unless another request is in
    /// flight.
    pub async fn request_anomaly_review(&self, log_lines: &[String]) -> BriefingOutcome {
        let kind = BriefingKind::AnomalyReview;
        let Some(guard) = self.acquire(kind) else {
            return BriefingOutcome::Busy;
        };
        if log_lines.is_empty() {
            guard.show(NOT_ENOUGH_DATA);
            info!("Anomaly review skipped, event log is empty");
            return BriefingOutcome::NotEnoughData;
        }
        let prompt = self.prompts.anomaly_review(log_lines);
        self.ask(guard, kind, prompt).await
    }

    fn acquire(&self, kind: BriefingKind) -> Option<BusyGuard<'_>> {
        let guard = BusyGuard::acquire(&self.panel);
        if guard.is_none() {
            info!(?kind, "Briefing request refused, another request is in flight");
        }
        guard
    }

    async fn ask(
        &self,
        guard: BusyGuard<'_>,
        kind: BriefingKind,
        prompt: Result<String, BriefingError>,
    ) -> BriefingOutcome {
        let result = match prompt {
            Ok(prompt) => self.backend.complete(&prompt).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => {
                info!(?kind, model = self.backend.model(), chars = text.len(), "Briefing received");
                guard.show(&text);
                BriefingOutcome::Answered(text)
            }
            Err(e) => {
                warn!(?kind, cause = e.cause(), error = %e, "Briefing request failed");
                guard.show(APOLOGY);
                BriefingOutcome::Failed
            }
        }
    }
}

/// Holds the panel in its busy state until dropped.
struct BusyGuard<'a> {
    panel: &'a Mutex<BriefingPanel>,
}

impl<'a> BusyGuard<'a> {
    /// Enter the busy state: loader on, output cleared, buttons disabled.
    /// Returns `None` if the panel is already busy.
    fn acquire(panel: &'a Mutex<BriefingPanel>) -> Option<Self> {
        let mut state = lock(panel);
        if state.busy {
            return None;
        }
        state.busy = true;
        state.output.clear();
        state.controls_enabled = false;
        Some(Self { panel })
    }

    fn show(&self, text: &str) {
        text.clone_into(&mut lock(self.panel).output);
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.panel);
        state.busy = false;
        state.controls_enabled = true;
    }
}

/// Lock the panel, recovering from poisoning since the state is plain data.
fn lock(panel: &Mutex<BriefingPanel>) -> MutexGuard<'_, BriefingPanel> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::llm::GeminiConfig;

    fn unreachable_client() -> BriefingClient {
        let backend = GeminiBackend::new(&GeminiConfig {
            api_url: "http://127.0.0.1:1".to_owned(),
            model: "gemini-2.0-flash".to_owned(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap();
        BriefingClient::new(backend, PromptEngine::new().unwrap())
    }

    #[test]
    fn guard_restores_idle_on_drop() {
        let panel = Mutex::new(BriefingPanel::default());
        {
            let guard = BusyGuard::acquire(&panel).unwrap();
            assert!(lock(&panel).busy);
            assert!(!lock(&panel).controls_enabled);
            assert!(BusyGuard::acquire(&panel).is_none());
            guard.show("partial");
        }
        let state = lock(&panel).clone();
        assert!(!state.busy);
        assert!(state.controls_enabled);
        assert_eq!(state.output, "partial");
    }

    #[test]
    fn acquire_clears_previous_output() {
        let panel = Mutex::new(BriefingPanel {
            busy: false,
            output: "old answer".to_owned(),
            controls_enabled: true,
        });
        let _guard = BusyGuard::acquire(&panel).unwrap();
        assert!(lock(&panel).output.is_empty());
    }

    #[tokio::test]
    async fn empty_log_short_circuits() {
        let client = unreachable_client();
        let outcome = client.request_anomaly_review(&[]).await;
        assert_eq!(outcome, BriefingOutcome::NotEnoughData);
        let panel = client.panel();
        assert_eq!(panel.output, NOT_ENOUGH_DATA);
        assert!(!panel.busy);
        assert!(panel.controls_enabled);
    }

    #[tokio::test]
    async fn empty_log_while_busy_is_refused() {
        let client = unreachable_client();
        let _in_flight = BusyGuard::acquire(&client.panel).unwrap();

        let outcome = client.request_anomaly_review(&[]).await;
        assert_eq!(outcome, BriefingOutcome::Busy);
        let panel = client.panel();
        assert!(panel.output.is_empty());
        assert!(panel.busy);
        assert!(!panel.controls_enabled);
    }

    #[tokio::test]
    async fn transport_failure_shows_apology() {
        let client = unreachable_client();
        let outcome = client.request_briefing(&[0; 10], &[0; 10]).await;
        assert_eq!(outcome, BriefingOutcome::Failed);
        let panel = client.panel();
        assert_eq!(panel.output, APOLOGY);
        assert!(!panel.busy);
        assert!(panel.controls_enabled);
    }
}
