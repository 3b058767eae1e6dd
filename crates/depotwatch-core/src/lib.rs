//! Scheduler, simulation, event log, and rolling charts for Depotwatch.
//!
//! This crate owns every piece of mutable dashboard state and the timer
//! model that drives it. Nothing here knows about HTTP or the browser;
//! the observer crate renders [`dashboard::Dashboard::snapshot`] output.
//!
//! # Modules
//!
//! - [`chart`] -- Fixed-width rolling chart series.
//! - [`clock`] -- Wall-clock derivation and timestamp formatting.
//! - [`config`] -- Configuration loading from `depotwatch-config.yaml`.
//! - [`counters`] -- Goods and vehicle throughput accumulators.
//! - [`dashboard`] -- The session coordinator and its timer jobs.
//! - [`event_log`] -- Bounded newest-first event log.
//! - [`runner`] -- Real-time driver over the virtual scheduler.
//! - [`scheduler`] -- [`scheduler::Scheduler`] trait and virtual implementation.
//! - [`simulation`] -- Synthetic detection and loading event generation.

pub mod chart;
pub mod clock;
pub mod config;
pub mod counters;
pub mod dashboard;
pub mod event_log;
pub mod runner;
pub mod scheduler;
pub mod simulation;

pub use dashboard::{Dashboard, DashboardError, DashboardStatus};
