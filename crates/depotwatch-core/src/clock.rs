//! Wall-clock derivation and time formatting for the dashboard.
//!
//! The dashboard never reads the system clock directly. It is handed a
//! wall-clock origin at construction and derives the current wall time
//! as `origin + elapsed`, where `elapsed` comes from the scheduler. In
//! production the origin is the local time at startup and elapsed time
//! tracks real time; in tests both are fixed, so every rendered
//! timestamp is deterministic.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Format used by the clock slot.
const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Format used for event log prefixes.
const LOG_STAMP_FORMAT: &str = "%H:%M:%S";

/// Format used for chart x-axis labels.
const CHART_LABEL_FORMAT: &str = "%H:%M";

/// Wall clock anchored at a fixed origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    origin: NaiveDateTime,
}

impl WallClock {
    /// Anchor a clock at the given local wall time.
    pub const fn new(origin: NaiveDateTime) -> Self {
        Self { origin }
    }

    /// Anchor a clock at the current local time.
    pub fn starting_now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// The origin this clock was anchored at.
    pub const fn origin(&self) -> NaiveDateTime {
        self.origin
    }

    /// Wall time after `elapsed` has passed since the origin.
    ///
    /// Saturates at the origin if `elapsed` cannot be represented.
    pub fn at(&self, elapsed: Duration) -> NaiveDateTime {
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| self.origin.checked_add_signed(delta))
            .unwrap_or(self.origin)
    }

    /// Text for the current-time slot.
    pub fn display_time(&self, elapsed: Duration) -> String {
        self.at(elapsed).format(CLOCK_FORMAT).to_string()
    }

    /// Prefix stamp for an event log entry, without brackets.
    pub fn log_stamp(&self, elapsed: Duration) -> String {
        self.at(elapsed).format(LOG_STAMP_FORMAT).to_string()
    }

    /// X-axis label for a chart point.
    pub fn chart_label(&self, elapsed: Duration) -> String {
        self.at(elapsed).format(CHART_LABEL_FORMAT).to_string()
    }
}

/// Format an integer with `,` thousands separators (`1234567` -> `1,234,567`).
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len.saturating_add(len / 3));
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len.saturating_sub(i);
        if i > 0 && remaining % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn nine_am() -> WallClock {
        let origin = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        WallClock::new(origin)
    }

    #[test]
    fn display_time_advances_with_elapsed() {
        let clock = nine_am();
        assert_eq!(clock.display_time(Duration::ZERO), "09:00:00");
        assert_eq!(clock.display_time(Duration::from_secs(75)), "09:01:15");
    }

    #[test]
    fn chart_label_drops_seconds() {
        let clock = nine_am();
        assert_eq!(clock.chart_label(Duration::from_secs(30)), "09:00");
        assert_eq!(clock.chart_label(Duration::from_secs(3_600)), "10:00");
    }

    #[test]
    fn log_stamp_crosses_midnight() {
        let origin = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(23, 59, 55)
            .unwrap();
        let clock = WallClock::new(origin);
        assert_eq!(clock.log_stamp(Duration::from_secs(10)), "00:00:05");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(12_345), "12,345");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}
