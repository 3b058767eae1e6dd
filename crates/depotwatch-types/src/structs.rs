//! Core data structs shared between the dashboard engine and its views.
//!
//! Everything here is a plain, serialisable projection. Mutation lives in
//! `depotwatch-core`; these types are what the rendering surface sees.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ChartKind, LogCategory};

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// A single event log entry.
///
/// `text` already carries the `[HH:MM:SS] ` timestamp prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LogEntry {
    /// Pre-formatted entry text including the timestamp prefix.
    pub text: String,
    /// What kind of event this entry describes.
    pub category: LogCategory,
}

/// One rendered row of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LogRow {
    /// Row text.
    pub text: String,
    /// Category-dependent style class.
    pub class: String,
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            text: entry.text.clone(),
            class: entry.category.css_class().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Fixed visual style handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChartStyle {
    /// Chart type understood by the renderer (always `line`).
    pub chart_type: String,
    /// Line colour.
    pub border_color: String,
    /// Area fill colour under the line.
    pub background_color: String,
    /// Line width in pixels.
    pub border_width: u32,
    /// Bezier curve tension.
    pub tension: f64,
    /// Whether the y axis is forced to start at zero.
    pub begin_at_zero: bool,
    /// Whether the legend is shown.
    pub legend_display: bool,
    /// Whether the chart keeps its aspect ratio instead of filling its container.
    pub maintain_aspect_ratio: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            chart_type: "line".to_owned(),
            border_color: "rgba(52, 211, 153, 1)".to_owned(),
            background_color: "rgba(52, 211, 153, 0.1)".to_owned(),
            border_width: 2,
            tension: 0.4,
            begin_at_zero: true,
            legend_display: false,
            maintain_aspect_ratio: false,
        }
    }
}

/// Render-ready view of a rolling chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChartView {
    /// Which chart this is.
    pub kind: ChartKind,
    /// Dataset label.
    pub label: String,
    /// X-axis labels, oldest first.
    pub labels: Vec<String>,
    /// Data points, oldest first. Same length as `labels`.
    pub values: Vec<u64>,
    /// Visual style.
    pub style: ChartStyle,
    /// Incremented on every push; lets views skip redundant redraws.
    pub revision: u64,
}

// ---------------------------------------------------------------------------
// Display slots
// ---------------------------------------------------------------------------

/// The named text slots on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DisplaySlots {
    /// Current wall-clock time.
    pub current_time: String,
    /// Plate of the vehicle at the gate, or the idle sentinel.
    pub vehicle_plate: String,
    /// Cumulative goods counter with thousands separators.
    pub goods_counter: String,
    /// Detection confidence, e.g. `93.4%`.
    pub confidence: String,
    /// Camera snapshot image reference.
    pub snapshot_url: String,
}

// ---------------------------------------------------------------------------
// Briefing panel
// ---------------------------------------------------------------------------

/// State of the text-generation output panel and its trigger buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BriefingPanel {
    /// Whether the loading indicator is visible.
    pub busy: bool,
    /// Text currently shown in the output box.
    pub output: String,
    /// Whether both trigger buttons are enabled.
    pub controls_enabled: bool,
}

impl Default for BriefingPanel {
    fn default() -> Self {
        Self {
            busy: false,
            output: String::new(),
            controls_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Full snapshot
// ---------------------------------------------------------------------------

/// Everything a view needs to draw the dashboard in one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DashboardSnapshot {
    /// Text slots.
    pub display: DisplaySlots,
    /// Event log rows, newest first.
    pub log: Vec<LogRow>,
    /// Goods throughput chart.
    pub goods_chart: ChartView,
    /// Vehicle throughput chart.
    pub vehicles_chart: ChartView,
    /// Whether the simulation and chart feed are paused.
    pub paused: bool,
    /// Milliseconds of simulated time since start.
    pub elapsed_ms: u64,
}
