//! Engine binary for the Depotwatch yard dashboard.
//!
//! Wires the dashboard, its real-time runner, the briefing client and the
//! HTTP server together, then runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `depotwatch-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the dashboard and register its timers
//! 4. Build the briefing client
//! 5. Start the dashboard server
//! 6. Run the dashboard until shutdown

mod error;
mod observer_callback;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use depotwatch_briefing::{BriefingClient, GeminiBackend, GeminiConfig, PromptEngine};
use depotwatch_core::clock::WallClock;
use depotwatch_core::config::DashboardConfig;
use depotwatch_core::runner;
use depotwatch_core::Dashboard;
use depotwatch_observer::server::ServerConfig;
use depotwatch_observer::state::AppState;
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::ObserverCallback;

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "depotwatch-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the runner fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration. Logging is not up yet, so remember where
    //    it came from and report once the subscriber is installed.
    let (config, from_file) = load_config().context("failed to load configuration")?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("depotwatch-engine starting");
    if from_file {
        info!(path = CONFIG_PATH, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }
    info!(
        simulation_interval_ms = config.timing.simulation_interval_ms,
        idle_reset_ms = config.timing.idle_reset_ms,
        chart_feed_interval_ms = config.timing.chart_feed_interval_ms,
        seed = ?config.simulation.seed,
        "Dashboard configuration"
    );

    // 3. Build the dashboard.
    let mut dashboard = Dashboard::new(&config, WallClock::starting_now())
        .map_err(EngineError::from)?;
    dashboard.start().map_err(EngineError::from)?;
    let time_base = runner::TimeBase::starting_at(dashboard.elapsed());
    let dashboard = Arc::new(Mutex::new(dashboard));

    // 4. Build the briefing client.
    if config.llm.api_key.is_empty() {
        warn!("No API key configured, briefing requests rely on a credential-injecting proxy");
    }
    let gemini = GeminiConfig {
        api_url: config.llm.api_url.clone(),
        model: config.llm.model.clone(),
        api_key: config.llm.api_key.clone(),
        request_timeout: Duration::from_millis(config.llm.request_timeout_ms),
    };
    let backend = GeminiBackend::new(&gemini).map_err(EngineError::from)?;
    let prompts = PromptEngine::new().map_err(EngineError::from)?;
    let briefing = Arc::new(BriefingClient::new(backend, prompts));
    info!(model = gemini.model, "Briefing client ready");

    // 5. Start the dashboard server.
    let app_state = Arc::new(AppState::new(Arc::clone(&dashboard), time_base, briefing));
    let server = depotwatch_observer::spawn_observer(
        &ServerConfig::from(&config.observer),
        Arc::clone(&app_state),
    )
    .await
    .map_err(EngineError::from)?;
    info!(addr = %server.addr, "Dashboard server started");

    // 6. Run until Ctrl-C.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        let _ = shutdown_tx.send(true);
    });

    let summary = runner::run_dashboard(
        dashboard,
        time_base,
        ObserverCallback::new(app_state),
        shutdown_rx,
    )
    .await
    .map_err(EngineError::from)?;

    server.task.abort();

    info!(
        jobs_dispatched = summary.jobs_dispatched,
        "depotwatch-engine shutdown complete"
    );

    Ok(())
}

/// Load the dashboard configuration from [`CONFIG_PATH`].
///
/// Falls back to defaults (still subject to env overrides) when the
/// file is absent. The flag reports whether the file was read.
fn load_config() -> Result<(DashboardConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((DashboardConfig::from_file(config_path)?, true))
    } else {
        Ok((DashboardConfig::parse("{}")?, false))
    }
}
