//! Configuration loading and typed config structures for Depotwatch.
//!
//! The canonical configuration lives in `depotwatch-config.yaml` in the
//! working directory. This module defines strongly-typed structs that
//! mirror the YAML structure, a loader that reads the file, and a
//! validator that rejects timer and generator settings the dashboard
//! cannot honour.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible setup.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level dashboard configuration.
///
/// Mirrors the structure of `depotwatch-config.yaml`. Every field has a
/// default so an empty file (or no file) yields the stock dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Timer periods and delays.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Synthetic event generation parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Event log settings.
    #[serde(default)]
    pub event_log: EventLogConfig,

    /// Rolling chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,

    /// HTTP surface settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Text-generation API settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `GEMINI_API_KEY` overrides `llm.api_key`
    /// - `OBSERVER_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, apply env overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override secrets and ports with environment variables when set.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            self.llm.api_key = val;
        }
        if let Ok(val) = std::env::var("OBSERVER_PORT") {
            self.observer.port = val.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("invalid OBSERVER_PORT {val:?}: {e}"),
            })?;
        }
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.clock_interval_ms == 0
            || t.simulation_interval_ms == 0
            || t.idle_reset_ms == 0
            || t.chart_feed_interval_ms == 0
        {
            return Err(invalid("timer intervals must be non-zero"));
        }
        if t.idle_reset_ms >= t.simulation_interval_ms {
            return Err(invalid(format!(
                "idle_reset_ms ({}) must be shorter than simulation_interval_ms ({})",
                t.idle_reset_ms, t.simulation_interval_ms
            )));
        }

        let s = &self.simulation;
        if s.goods_min > s.goods_max {
            return Err(invalid(format!(
                "goods_min ({}) exceeds goods_max ({})",
                s.goods_min, s.goods_max
            )));
        }
        if !s.confidence_floor.is_finite()
            || !s.confidence_span.is_finite()
            || s.confidence_floor < 0.0
            || s.confidence_span <= 0.0
        {
            return Err(invalid("confidence_floor and confidence_span must be finite and positive"));
        }

        if self.event_log.capacity == 0 {
            return Err(invalid("event_log.capacity must be at least 1"));
        }
        if self.charts.window < 2 {
            return Err(invalid("charts.window must be at least 2"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Timer periods and delays, in real-time milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// How often the displayed clock is refreshed.
    #[serde(default = "default_clock_interval_ms")]
    pub clock_interval_ms: u64,

    /// Period of the simulation tick.
    #[serde(default = "default_simulation_interval_ms")]
    pub simulation_interval_ms: u64,

    /// Delay after a tick before the gate display returns to idle.
    /// Must be shorter than `simulation_interval_ms`.
    #[serde(default = "default_idle_reset_ms")]
    pub idle_reset_ms: u64,

    /// Period of the chart feed.
    #[serde(default = "default_chart_feed_interval_ms")]
    pub chart_feed_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_interval_ms: default_clock_interval_ms(),
            simulation_interval_ms: default_simulation_interval_ms(),
            idle_reset_ms: default_idle_reset_ms(),
            chart_feed_interval_ms: default_chart_feed_interval_ms(),
        }
    }
}

/// Synthetic event generation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducible runs. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Two-letter region prefix of generated plates.
    #[serde(default = "default_plate_region")]
    pub plate_region: String,

    /// Two-letter series infix of generated plates.
    #[serde(default = "default_plate_series")]
    pub plate_series: String,

    /// Smallest goods quantity per tick (inclusive).
    #[serde(default = "default_goods_min")]
    pub goods_min: u64,

    /// Largest goods quantity per tick (inclusive).
    #[serde(default = "default_goods_max")]
    pub goods_max: u64,

    /// Lowest detection confidence percentage (inclusive).
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Width of the confidence range; readings fall in `[floor, floor + span)`.
    #[serde(default = "default_confidence_span")]
    pub confidence_span: f64,

    /// Camera frame URL; `{seed}` is replaced with a fresh random value.
    #[serde(default = "default_snapshot_url_template")]
    pub snapshot_url_template: String,

    /// Image shown while no vehicle is at the gate.
    #[serde(default = "default_placeholder_snapshot")]
    pub placeholder_snapshot: String,

    /// Plate text shown while no vehicle is at the gate.
    #[serde(default = "default_idle_plate")]
    pub idle_plate: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            plate_region: default_plate_region(),
            plate_series: default_plate_series(),
            goods_min: default_goods_min(),
            goods_max: default_goods_max(),
            confidence_floor: default_confidence_floor(),
            confidence_span: default_confidence_span(),
            snapshot_url_template: default_snapshot_url_template(),
            placeholder_snapshot: default_placeholder_snapshot(),
            idle_plate: default_idle_plate(),
        }
    }
}

/// Event log settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventLogConfig {
    /// Maximum number of retained entries.
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
        }
    }
}

/// Rolling chart settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartsConfig {
    /// Number of points kept in each chart window.
    #[serde(default = "default_chart_window")]
    pub window: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            window: default_chart_window(),
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Address to bind.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Text-generation API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LlmConfig {
    /// Base API URL, without the `/models/...` suffix.
    #[serde(default = "default_llm_api_url")]
    pub api_url: String,

    /// Model name used in the `generateContent` path.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key. May be empty when a proxy injects credentials.
    #[serde(default)]
    pub api_key: String,

    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_llm_api_url(),
            model: default_llm_model(),
            api_key: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_clock_interval_ms() -> u64 {
    1_000
}

const fn default_simulation_interval_ms() -> u64 {
    10_000
}

const fn default_idle_reset_ms() -> u64 {
    7_000
}

const fn default_chart_feed_interval_ms() -> u64 {
    30_000
}

fn default_plate_region() -> String {
    "MH".to_owned()
}

fn default_plate_series() -> String {
    "AB".to_owned()
}

const fn default_goods_min() -> u64 {
    10
}

const fn default_goods_max() -> u64 {
    59
}

const fn default_confidence_floor() -> f64 {
    85.0
}

const fn default_confidence_span() -> f64 {
    15.0
}

fn default_snapshot_url_template() -> String {
    "https://picsum.photos/seed/{seed}/600/400".to_owned()
}

fn default_placeholder_snapshot() -> String {
    "https://placehold.co/600x400/1f2937/374151?text=No+Event".to_owned()
}

fn default_idle_plate() -> String {
    "-- WAITING --".to_owned()
}

const fn default_log_capacity() -> usize {
    20
}

const fn default_chart_window() -> usize {
    10
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_llm_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_owned()
}

fn default_llm_model() -> String {
    "gemini-2.0-flash".to_owned()
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
