//! The dashboard session: one owner for every piece of mutable state.
//!
//! [`Dashboard`] holds the display slots, event log, both rolling charts,
//! the throughput counters, the random source and the scheduler. Timer
//! callbacks are [`Job`]s dispatched by [`Dashboard::advance_to`], so the
//! same code runs under the real-time runner and under tests that step a
//! [`VirtualScheduler`] by hand.
//!
//! # Timers
//!
//! | Job | Kind | Default |
//! |-----|------|---------|
//! | [`Job::SimulationTick`] | periodic | 10 s |
//! | [`Job::ChartFeed`] | periodic | 30 s |
//! | [`Job::ClockTick`] | periodic | 1 s |
//! | [`Job::IdleReset`] | one-shot after each tick | 7 s |
//!
//! The simulation and chart-feed timers free-run from [`Dashboard::start`];
//! chart-feed boundaries are not aligned with simulation ticks.

use std::time::Duration;

use depotwatch_types::{ChartKind, DashboardSnapshot, DisplaySlots, LogCategory};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::chart::RollingChart;
use crate::clock::{WallClock, format_thousands};
use crate::config::{ConfigError, DashboardConfig, TimingConfig};
use crate::counters::{IntervalCounts, ThroughputCounters};
use crate::event_log::EventLog;
use crate::scheduler::{Fired, Job, Scheduler, SchedulerError, TimerId, VirtualScheduler};
use crate::simulation::{EventGenerator, VehicleDetection};

/// Confidence slot text before the first detection.
const NO_CONFIDENCE: &str = "--";

/// Errors raised while driving the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The configuration failed validation.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A timer could not be registered.
    #[error("scheduler error: {source}")]
    Scheduler {
        /// The underlying scheduler error.
        #[from]
        source: SchedulerError,
    },
}

/// What one simulation tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// The fabricated detection.
    pub detection: VehicleDetection,
    /// Units loaded this tick.
    pub goods: u64,
    /// Units loaded since startup, after this tick.
    pub total_goods: u64,
}

/// Run counters and pause flag for the operator API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStatus {
    /// Whether the simulation and chart feed are paused.
    pub paused: bool,
    /// Milliseconds of simulated time since start.
    pub elapsed_ms: u64,
    /// Simulation ticks run so far.
    pub ticks: u64,
    /// Chart feeds run so far.
    pub feeds: u64,
}

/// Live timer handles.
#[derive(Debug, Clone, Copy, Default)]
struct Timers {
    clock: Option<TimerId>,
    simulation: Option<TimerId>,
    chart_feed: Option<TimerId>,
}

/// The yard monitoring session.
#[derive(Debug)]
pub struct Dashboard<S: Scheduler = VirtualScheduler> {
    timing: TimingConfig,
    scheduler: S,
    rng: StdRng,
    generator: EventGenerator,
    clock: WallClock,
    display: DisplaySlots,
    log: EventLog,
    goods_chart: RollingChart,
    vehicles_chart: RollingChart,
    counters: ThroughputCounters,
    timers: Timers,
    paused: bool,
    ticks: u64,
    feeds: u64,
}

impl Dashboard<VirtualScheduler> {
    /// Build a dashboard from configuration.
    ///
    /// The random source is seeded from `simulation.seed` when set and
    /// from the OS otherwise. No timers run until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the configuration is invalid.
    pub fn new(config: &DashboardConfig, clock: WallClock) -> Result<Self, DashboardError> {
        let rng = config
            .simulation
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self::with_parts(config, clock, VirtualScheduler::new(), rng)
    }
}

impl<S: Scheduler> Dashboard<S> {
    /// Build a dashboard from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the configuration is invalid.
    pub fn with_parts(
        config: &DashboardConfig,
        clock: WallClock,
        scheduler: S,
        rng: StdRng,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        let generator = EventGenerator::new(config.simulation.clone());
        let display = DisplaySlots {
            current_time: clock.display_time(scheduler.now()),
            vehicle_plate: generator.idle_plate().to_owned(),
            goods_counter: format_thousands(0),
            confidence: NO_CONFIDENCE.to_owned(),
            snapshot_url: generator.placeholder_snapshot().to_owned(),
        };

        Ok(Self {
            timing: config.timing.clone(),
            scheduler,
            rng,
            generator,
            clock,
            display,
            log: EventLog::new(config.event_log.capacity),
            goods_chart: RollingChart::new(ChartKind::Goods, config.charts.window),
            vehicles_chart: RollingChart::new(ChartKind::Vehicles, config.charts.window),
            counters: ThroughputCounters::default(),
            timers: Timers::default(),
            paused: false,
            ticks: 0,
            feeds: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Timer wiring
    // -----------------------------------------------------------------------

    /// Register the simulation, chart-feed and clock timers.
    ///
    /// Calling `start` again is a no-op for timers that are already live.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Scheduler`] if a timer cannot be registered.
    pub fn start(&mut self) -> Result<(), DashboardError> {
        self.register_workload()?;
        if self.timers.clock.is_none() {
            let period = ms(self.timing.clock_interval_ms);
            self.timers.clock = Some(self.scheduler.schedule_periodic(period, Job::ClockTick)?);
        }
        info!(
            simulation_interval_ms = self.timing.simulation_interval_ms,
            chart_feed_interval_ms = self.timing.chart_feed_interval_ms,
            clock_interval_ms = self.timing.clock_interval_ms,
            "Dashboard timers started"
        );
        Ok(())
    }

    fn register_workload(&mut self) -> Result<(), DashboardError> {
        if self.timers.simulation.is_none() {
            let period = ms(self.timing.simulation_interval_ms);
            self.timers.simulation =
                Some(self.scheduler.schedule_periodic(period, Job::SimulationTick)?);
        }
        if self.timers.chart_feed.is_none() {
            let period = ms(self.timing.chart_feed_interval_ms);
            self.timers.chart_feed = Some(self.scheduler.schedule_periodic(period, Job::ChartFeed)?);
        }
        Ok(())
    }

    /// Stop generating events and feeding charts. The clock keeps running
    /// and a pending idle reset still fires.
    pub fn pause(&mut self) {
        if let Some(id) = self.timers.simulation.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.timers.chart_feed.take() {
            self.scheduler.cancel(id);
        }
        if !self.paused {
            info!(elapsed_ms = self.elapsed_ms(), "Dashboard paused");
        }
        self.paused = true;
    }

    /// Restart event generation and chart feeds. Both periods restart
    /// from the scheduler's current time, so a caller driven by a real
    /// clock should use [`resume_at`](Self::resume_at) instead.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Scheduler`] if a timer cannot be registered.
    pub fn resume(&mut self) -> Result<(), DashboardError> {
        if !self.paused {
            return Ok(());
        }
        self.register_workload()?;
        self.paused = false;
        info!(elapsed_ms = self.elapsed_ms(), "Dashboard resumed");
        Ok(())
    }

    /// Catch up to `now`, then resume. The first tick and feed after the
    /// resume land one full period after `now`.
    ///
    /// Returns the jobs that ran while catching up.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Scheduler`] if a timer cannot be registered.
    pub fn resume_at(&mut self, now: Duration) -> Result<Vec<Fired>, DashboardError> {
        let fired = self.advance_to(now)?;
        self.resume()?;
        Ok(fired)
    }

    /// Virtual time of the next due job.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Run every job due up to `until`, in order, then move time to `until`.
    ///
    /// Returns the jobs that ran.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Scheduler`] if a job cannot schedule its
    /// follow-up timer.
    pub fn advance_to(&mut self, until: Duration) -> Result<Vec<Fired>, DashboardError> {
        let mut fired = Vec::new();
        while let Some(next) = self.scheduler.fire_next(until) {
            self.dispatch(next)?;
            fired.push(next);
        }
        self.scheduler.settle(until);
        Ok(fired)
    }

    /// Advance by `delta` from the current virtual time.
    ///
    /// # Errors
    ///
    /// See [`advance_to`](Self::advance_to).
    pub fn advance_by(&mut self, delta: Duration) -> Result<Vec<Fired>, DashboardError> {
        let until = self.scheduler.now().saturating_add(delta);
        self.advance_to(until)
    }

    fn dispatch(&mut self, fired: Fired) -> Result<(), DashboardError> {
        match fired.job {
            Job::ClockTick => self.update_clock(),
            Job::SimulationTick => {
                self.simulation_tick()?;
            }
            Job::IdleReset => self.idle_reset(),
            Job::ChartFeed => {
                self.feed_charts();
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Jobs
    // -----------------------------------------------------------------------

    /// Refresh the current-time slot.
    pub fn update_clock(&mut self) {
        self.display.current_time = self.clock.display_time(self.scheduler.now());
    }

    /// Fabricate one vehicle detection and one loading event, update the
    /// display and log, and arm the idle reset.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Scheduler`] if the idle reset cannot be armed.
    pub fn simulation_tick(&mut self) -> Result<TickReport, DashboardError> {
        let stamp = self.clock.log_stamp(self.scheduler.now());

        let detection = self.generator.detect_vehicle(&mut self.rng);
        self.display.vehicle_plate.clone_from(&detection.plate);
        self.counters.record_vehicle();
        self.display.snapshot_url.clone_from(&detection.snapshot_url);
        self.display.confidence = detection.confidence_label();
        self.log.add_entry(
            &stamp,
            &format!("Vehicle detected: {}", detection.plate),
            LogCategory::Vehicle,
        );

        let goods = self.generator.goods_amount(&mut self.rng);
        self.counters.record_goods(goods);
        let total_goods = self.counters.total_goods();
        self.display.goods_counter = format_thousands(total_goods);
        self.log
            .add_entry(&stamp, &format!("{goods} units loaded."), LogCategory::Goods);

        let delay = ms(self.timing.idle_reset_ms);
        self.scheduler.schedule_once(delay, Job::IdleReset)?;
        self.ticks = self.ticks.saturating_add(1);

        debug!(
            plate = detection.plate,
            confidence = detection.confidence,
            goods,
            total_goods,
            "Simulation tick"
        );

        Ok(TickReport {
            detection,
            goods,
            total_goods,
        })
    }

    /// Return the gate display to its idle state.
    pub fn idle_reset(&mut self) {
        self.display.vehicle_plate = self.generator.idle_plate().to_owned();
        self.display.snapshot_url = self.generator.placeholder_snapshot().to_owned();
    }

    /// Push the current interval's counts into both charts and reset them.
    pub fn feed_charts(&mut self) -> IntervalCounts {
        let counts = self.counters.take_recent();
        let label = self.clock.chart_label(self.scheduler.now());
        self.goods_chart.push(label.clone(), counts.goods);
        self.vehicles_chart.push(label, counts.vehicles);
        self.feeds = self.feeds.saturating_add(1);
        info!(
            goods = counts.goods,
            vehicles = counts.vehicles,
            "Charts fed"
        );
        counts
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Current display slots.
    pub const fn display(&self) -> &DisplaySlots {
        &self.display
    }

    /// The event log.
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    /// The goods chart.
    pub const fn goods_chart(&self) -> &RollingChart {
        &self.goods_chart
    }

    /// The vehicles chart.
    pub const fn vehicles_chart(&self) -> &RollingChart {
        &self.vehicles_chart
    }

    /// Throughput counters.
    pub const fn counters(&self) -> &ThroughputCounters {
        &self.counters
    }

    /// Goods and vehicle series as plotted, oldest first.
    pub fn chart_values(&self) -> (Vec<u64>, Vec<u64>) {
        (self.goods_chart.values(), self.vehicles_chart.values())
    }

    /// Log lines as displayed, newest first.
    pub fn log_text(&self) -> Vec<String> {
        self.log.lines()
    }

    /// Virtual time since construction.
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.scheduler.now().as_millis()).unwrap_or(u64::MAX)
    }

    /// Whether the simulation and chart feed are paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause flag and run counters.
    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            paused: self.paused,
            elapsed_ms: self.elapsed_ms(),
            ticks: self.ticks,
            feeds: self.feeds,
        }
    }

    /// Render everything a view needs.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            display: self.display.clone(),
            log: self.log.render(),
            goods_chart: self.goods_chart.render(),
            vehicles_chart: self.vehicles_chart.render(),
            paused: self.paused,
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

/// Milliseconds from config as a [`Duration`].
const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn seeded_config() -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.simulation.seed = Some(1234);
        config
    }

    fn make_dashboard() -> Dashboard {
        let origin = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let mut dashboard = Dashboard::new(&seeded_config(), WallClock::new(origin)).unwrap();
        dashboard.start().unwrap();
        dashboard
    }

    #[test]
    fn fresh_dashboard_is_idle() {
        let dashboard = make_dashboard();
        let display = dashboard.display();
        assert_eq!(display.vehicle_plate, "-- WAITING --");
        assert_eq!(display.goods_counter, "0");
        assert_eq!(display.current_time, "08:00:00");
        assert!(dashboard.log().is_empty());
        assert_eq!(dashboard.goods_chart().values(), vec![0; 10]);
    }

    #[test]
    fn one_tick_updates_display_counters_and_log() {
        let mut dashboard = make_dashboard();
        let fired = dashboard.advance_to(secs(10)).unwrap();
        assert!(fired.iter().any(|f| f.job == Job::SimulationTick));

        let plate = dashboard.display().vehicle_plate.clone();
        assert_ne!(plate, "-- WAITING --");
        assert_eq!(dashboard.counters().recent().vehicles, 1);
        assert!(dashboard.display().confidence.ends_with('%'));
        assert_ne!(
            dashboard.display().snapshot_url,
            "https://placehold.co/600x400/1f2937/374151?text=No+Event"
        );

        let lines = dashboard.log().lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().is_some_and(|l| l.ends_with("units loaded.")));
        assert_eq!(
            lines.get(1).map(String::as_str),
            Some(format!("[08:00:10] Vehicle detected: {plate}").as_str())
        );

        let total = dashboard.counters().total_goods();
        assert!((10..=59).contains(&total));
        assert_eq!(dashboard.display().goods_counter, total.to_string());
    }

    #[test]
    fn idle_reset_fires_before_next_tick() {
        let mut dashboard = make_dashboard();
        dashboard.advance_to(secs(16)).unwrap();
        assert_ne!(dashboard.display().vehicle_plate, "-- WAITING --");

        dashboard.advance_to(secs(17)).unwrap();
        assert_eq!(dashboard.display().vehicle_plate, "-- WAITING --");
        assert_eq!(
            dashboard.display().snapshot_url,
            "https://placehold.co/600x400/1f2937/374151?text=No+Event"
        );
        assert_eq!(dashboard.log().len(), 2);
    }

    #[test]
    fn chart_feed_flushes_and_resets_counters() {
        let mut dashboard = make_dashboard();
        dashboard.advance_to(secs(29)).unwrap();
        let goods_before = dashboard.counters().recent().goods;
        assert_eq!(dashboard.counters().recent().vehicles, 2);

        dashboard.advance_to(secs(30)).unwrap();
        assert_eq!(dashboard.counters().recent(), IntervalCounts::default());

        let vehicles = dashboard.vehicles_chart().values();
        assert_eq!(vehicles.last(), Some(&3));
        let goods = dashboard.goods_chart().values();
        let pushed = goods.last().copied().unwrap_or_default();
        assert!(pushed > goods_before);
        assert_eq!(pushed, dashboard.counters().total_goods());
        let labels: Vec<&str> = dashboard.goods_chart().labels().collect();
        assert_eq!(labels.last(), Some(&"08:00"));
    }

    #[test]
    fn invariants_hold_over_a_long_run() {
        let mut dashboard = make_dashboard();
        let mut last_total = 0;
        for step in 1..=400 {
            dashboard.advance_to(secs(step * 3)).unwrap();
            let total = dashboard.counters().total_goods();
            assert!(total >= last_total);
            last_total = total;
            assert!(dashboard.log().len() <= 20);
            assert_eq!(dashboard.goods_chart().values().len(), 10);
            assert_eq!(dashboard.vehicles_chart().labels().len(), 10);
        }
        assert_eq!(dashboard.status().ticks, 120);
        assert_eq!(dashboard.status().feeds, 40);
        assert_eq!(dashboard.log().len(), 20);
    }

    #[test]
    fn clock_slot_tracks_virtual_time() {
        let mut dashboard = make_dashboard();
        dashboard.advance_to(Duration::from_millis(61_500)).unwrap();
        assert_eq!(dashboard.display().current_time, "08:01:01");
    }

    #[test]
    fn pause_stops_ticks_and_feeds_but_not_clock() {
        let mut dashboard = make_dashboard();
        dashboard.advance_to(secs(10)).unwrap();
        dashboard.pause();
        assert!(dashboard.is_paused());

        dashboard.advance_to(secs(100)).unwrap();
        assert_eq!(dashboard.status().ticks, 1);
        assert_eq!(dashboard.status().feeds, 0);
        assert_eq!(dashboard.display().current_time, "08:01:40");
        assert_eq!(dashboard.display().vehicle_plate, "-- WAITING --");

        dashboard.resume().unwrap();
        dashboard.advance_to(secs(110)).unwrap();
        assert_eq!(dashboard.status().ticks, 2);
        dashboard.advance_to(secs(130)).unwrap();
        assert_eq!(dashboard.status().feeds, 1);
    }

    #[test]
    fn idle_reset_still_fires_while_paused() {
        let mut dashboard = make_dashboard();
        dashboard.advance_to(secs(12)).unwrap();
        assert_ne!(dashboard.display().vehicle_plate, "-- WAITING --");

        dashboard.pause();
        let fired = dashboard.advance_to(secs(17)).unwrap();
        assert!(fired.iter().any(|f| f.job == Job::IdleReset));
        assert_eq!(dashboard.display().vehicle_plate, "-- WAITING --");
    }

    #[test]
    fn resume_at_restarts_periods_from_the_given_instant() {
        let mut dashboard = make_dashboard();
        dashboard.advance_to(Duration::from_millis(5_500)).unwrap();
        dashboard.pause();

        let caught_up = dashboard.resume_at(Duration::from_millis(100_900)).unwrap();
        assert!(caught_up.iter().all(|f| f.job == Job::ClockTick));
        assert_eq!(dashboard.elapsed(), Duration::from_millis(100_900));
        assert_eq!(dashboard.display().current_time, "08:01:40");

        dashboard.advance_to(Duration::from_millis(110_899)).unwrap();
        assert_eq!(dashboard.status().ticks, 0);
        dashboard.advance_to(Duration::from_millis(110_900)).unwrap();
        assert_eq!(dashboard.status().ticks, 1);
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut a = make_dashboard();
        let mut b = make_dashboard();
        a.advance_to(secs(95)).unwrap();
        b.advance_to(secs(95)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut dashboard = make_dashboard();
        dashboard.advance_to(secs(30)).unwrap();
        let snap = dashboard.snapshot();
        assert_eq!(snap.log.len(), 6);
        assert_eq!(snap.elapsed_ms, 30_000);
        assert!(!snap.paused);
        assert_eq!(snap.goods_chart.revision, 1);
        assert_eq!(snap.vehicles_chart.values.last(), Some(&3));
    }

    #[test]
    fn briefing_inputs_follow_charts_and_log() {
        let mut dashboard = make_dashboard();
        assert!(dashboard.log_text().is_empty());

        let report = dashboard.simulation_tick().unwrap();
        let lines = dashboard.log_text();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(&format!("{} units loaded.", report.goods)));
        assert!(lines[1].ends_with(&format!("Vehicle detected: {}", report.detection.plate)));

        dashboard.feed_charts();
        let (goods, vehicles) = dashboard.chart_values();
        assert_eq!(goods.len(), 10);
        assert_eq!(goods.last(), Some(&report.goods));
        assert_eq!(vehicles.last(), Some(&1));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = seeded_config();
        config.timing.idle_reset_ms = 20_000;
        let origin = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let result = Dashboard::new(&config, WallClock::new(origin));
        assert!(matches!(result, Err(DashboardError::Config { .. })));
    }
}
