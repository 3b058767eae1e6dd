//! Bounded, newest-first event log.
//!
//! Entries are inserted at the front. Once the log holds `capacity`
//! entries, each insertion evicts the oldest one from the tail. There is
//! no other removal path.

use std::collections::VecDeque;

use depotwatch_types::{LogCategory, LogEntry, LogRow};

/// Newest-first log of yard events with a fixed capacity.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    /// Create an empty log. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend `"[stamp] text"` and evict from the tail beyond capacity.
    ///
    /// Returns the entry evicted by this insertion, if any.
    pub fn add_entry(&mut self, stamp: &str, text: &str, category: LogCategory) -> Option<LogEntry> {
        self.entries.push_front(LogEntry {
            text: format!("[{stamp}] {text}"),
            category,
        });
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry texts in stored (newest-first) order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }

    /// Project the log into one styled row per entry.
    pub fn render(&self) -> Vec<LogRow> {
        self.entries.iter().map(LogRow::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_is_first() {
        let mut log = EventLog::new(20);
        log.add_entry("09:00:10", "Vehicle detected: MH12AB1234", LogCategory::Vehicle);
        log.add_entry("09:00:10", "31 units loaded.", LogCategory::Goods);

        let lines = log.lines();
        assert_eq!(
            lines,
            vec![
                "[09:00:10] 31 units loaded.".to_owned(),
                "[09:00:10] Vehicle detected: MH12AB1234".to_owned(),
            ]
        );
    }

    #[test]
    fn twenty_five_inserts_keep_latest_twenty() {
        let mut log = EventLog::new(20);
        for i in 0..25 {
            log.add_entry("09:00:00", &format!("event {i}"), LogCategory::Goods);
            assert!(log.len() <= 20);
        }
        assert_eq!(log.len(), 20);

        let expected: Vec<String> = (5..25)
            .rev()
            .map(|i| format!("[09:00:00] event {i}"))
            .collect();
        assert_eq!(log.lines(), expected);
    }

    #[test]
    fn eviction_returns_the_oldest() {
        let mut log = EventLog::new(2);
        assert!(log.add_entry("t", "a", LogCategory::Goods).is_none());
        assert!(log.add_entry("t", "b", LogCategory::Goods).is_none());
        let evicted = log.add_entry("t", "c", LogCategory::Goods);
        assert_eq!(evicted.map(|e| e.text), Some("[t] a".to_owned()));
    }

    #[test]
    fn render_is_idempotent_and_styled() {
        let mut log = EventLog::new(20);
        log.add_entry("09:00:10", "Vehicle detected: MH12AB1234", LogCategory::Vehicle);
        log.add_entry("09:00:10", "31 units loaded.", LogCategory::Goods);

        let first = log.render();
        let second = log.render();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(first.first().is_some_and(|r| r.class.contains("green")));
        assert!(first.get(1).is_some_and(|r| r.class.contains("blue")));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut log = EventLog::new(0);
        log.add_entry("t", "a", LogCategory::Vehicle);
        log.add_entry("t", "b", LogCategory::Vehicle);
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().map(|e| e.text.as_str()), Some("[t] b"));
    }
}
