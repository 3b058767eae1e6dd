//! Throughput accumulators.
//!
//! `total_goods` only ever grows. The two `recent_*` counters accumulate
//! between chart feeds and are drained to zero by each feed.

/// Per-interval counts handed to the charts by a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalCounts {
    /// Units of goods loaded during the interval.
    pub goods: u64,
    /// Vehicles detected during the interval.
    pub vehicles: u64,
}

/// Running goods and vehicle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThroughputCounters {
    total_goods: u64,
    recent: IntervalCounts,
}

impl ThroughputCounters {
    /// Count one detected vehicle.
    pub const fn record_vehicle(&mut self) {
        self.recent.vehicles = self.recent.vehicles.saturating_add(1);
    }

    /// Count `amount` loaded units in both the total and the current interval.
    pub const fn record_goods(&mut self, amount: u64) {
        self.total_goods = self.total_goods.saturating_add(amount);
        self.recent.goods = self.recent.goods.saturating_add(amount);
    }

    /// Take the current interval's counts and start a new interval at zero.
    pub const fn take_recent(&mut self) -> IntervalCounts {
        let counts = self.recent;
        self.recent = IntervalCounts {
            goods: 0,
            vehicles: 0,
        };
        counts
    }

    /// Units loaded since startup.
    pub const fn total_goods(&self) -> u64 {
        self.total_goods
    }

    /// Counts accumulated since the last feed.
    pub const fn recent(&self) -> IntervalCounts {
        self.recent
    }
}
