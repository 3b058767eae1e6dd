//! Shared type definitions for the Depotwatch yard dashboard.
//!
//! Types defined here are what the dashboard engine publishes to its
//! rendering surface. They flow downstream to `TypeScript` via `ts-rs`
//! so the browser view can consume them without hand-written typings.
//!
//! # Modules
//!
//! - [`enums`] -- Log categories, chart kinds, briefing request kinds
//! - [`structs`] -- Log entries, chart views, display slots, snapshots

pub mod enums;
pub mod structs;

pub use enums::{BriefingKind, ChartKind, LogCategory};
pub use structs::{
    BriefingPanel, ChartStyle, ChartView, DashboardSnapshot, DisplaySlots, LogEntry, LogRow,
};
