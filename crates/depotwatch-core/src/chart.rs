//! Fixed-width rolling chart series.
//!
//! A chart holds exactly `window` labels and `window` values at all
//! times. Every push shifts the oldest point out of both sequences and
//! appends the new one, so the two never drift apart.

use std::collections::VecDeque;

use depotwatch_types::{ChartKind, ChartStyle, ChartView};

/// Label of the oldest slot in a fresh chart.
const START_LABEL: &str = "start";

/// Filler label for the interior slots of a fresh chart.
const FILLER_LABEL: &str = " ";

/// Label of the newest slot in a fresh chart.
const NOW_LABEL: &str = "now";

/// Rolling window of `(label, value)` points for one metric.
#[derive(Debug, Clone)]
pub struct RollingChart {
    kind: ChartKind,
    labels: VecDeque<String>,
    values: VecDeque<u64>,
    style: ChartStyle,
    revision: u64,
}

impl RollingChart {
    /// Create a chart of `window` points: placeholder labels ending in
    /// `"now"` and all-zero values. A window below two is raised to two.
    pub fn new(kind: ChartKind, window: usize) -> Self {
        let window = window.max(2);
        let mut labels = VecDeque::with_capacity(window);
        labels.push_back(START_LABEL.to_owned());
        for _ in 2..window {
            labels.push_back(FILLER_LABEL.to_owned());
        }
        labels.push_back(NOW_LABEL.to_owned());

        Self {
            kind,
            labels,
            values: std::iter::repeat_n(0, window).collect(),
            style: ChartStyle::default(),
            revision: 0,
        }
    }

    /// Shift out the oldest point and append `(label, value)`.
    pub fn push(&mut self, label: String, value: u64) {
        self.labels.pop_front();
        self.values.pop_front();
        self.labels.push_back(label);
        self.values.push_back(value);
        self.revision = self.revision.saturating_add(1);
    }

    /// Which chart this is.
    pub const fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Labels, oldest first.
    pub fn labels(&self) -> impl ExactSizeIterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Values, oldest first.
    pub fn values(&self) -> Vec<u64> {
        self.values.iter().copied().collect()
    }

    /// Number of pushes since construction.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Project the chart into a render-ready view.
    pub fn render(&self) -> ChartView {
        ChartView {
            kind: self.kind,
            label: self.kind.label().to_owned(),
            labels: self.labels.iter().cloned().collect(),
            values: self.values(),
            style: self.style.clone(),
            revision: self.revision,
        }
    }
}
