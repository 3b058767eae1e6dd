//! Enumeration types for the Depotwatch dashboard.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event log categories
// ---------------------------------------------------------------------------

/// The kind of yard event a log entry describes.
///
/// The category only drives styling: vehicle rows and goods rows are
/// rendered with different accent colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LogCategory {
    /// A vehicle was detected at the gate camera.
    Vehicle,
    /// Goods were loaded.
    Goods,
}

impl LogCategory {
    /// Style class used when rendering a row of this category.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Vehicle => "text-blue-300 p-1",
            Self::Goods => "text-green-300 p-1",
        }
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Which of the two throughput charts a series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ChartKind {
    /// Units of goods loaded per feed interval.
    Goods,
    /// Vehicles detected per feed interval.
    Vehicles,
}

impl ChartKind {
    /// Dataset label shown for the chart.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Goods => "Goods",
            Self::Vehicles => "Vehicles",
        }
    }
}

// ---------------------------------------------------------------------------
// Briefing requests
// ---------------------------------------------------------------------------

/// The two on-demand text-generation requests a user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BriefingKind {
    /// Shift-manager summary of both chart series.
    Briefing,
    /// Review of the event log for potential problems.
    AnomalyReview,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_have_distinct_accents() {
        assert_ne!(LogCategory::Vehicle.css_class(), LogCategory::Goods.css_class());
        assert!(LogCategory::Vehicle.css_class().contains("blue"));
        assert!(LogCategory::Goods.css_class().contains("green"));
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&LogCategory::Vehicle).unwrap_or_default();
        assert_eq!(json, "\"vehicle\"");
        let json = serde_json::to_string(&BriefingKind::AnomalyReview).unwrap_or_default();
        assert_eq!(json, "\"anomaly_review\"");
    }
}
