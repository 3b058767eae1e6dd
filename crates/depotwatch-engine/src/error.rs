//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and while the dashboard runs.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: depotwatch_core::config::ConfigError,
    },

    /// The dashboard could not be built or started.
    #[error("dashboard error: {source}")]
    Dashboard {
        /// The underlying dashboard error.
        #[from]
        source: depotwatch_core::DashboardError,
    },

    /// The briefing client could not be built.
    #[error("briefing error: {source}")]
    Briefing {
        /// The underlying briefing error.
        #[from]
        source: depotwatch_briefing::BriefingError,
    },

    /// The dashboard server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: depotwatch_observer::startup::StartupError,
    },

    /// The real-time runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: depotwatch_core::runner::RunnerError,
    },
}
