//! Timer scheduling on a virtual timeline.
//!
//! The dashboard is driven by three free-running periodic timers (clock,
//! simulation, chart feed) plus a one-shot idle reset after every
//! simulation tick. Rather than hanging side effects off real timers,
//! the dashboard registers [`Job`]s with a [`Scheduler`] and dispatches
//! them itself. Time only moves when the owner advances it, so tests can
//! step through hours of dashboard activity instantly.
//!
//! # Ordering
//!
//! Jobs fire in due-time order. Jobs due at the same instant fire in the
//! order their timers were registered, which mirrors how browser timers
//! with equal deadlines run in creation order.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::time::Duration;

/// Work the dashboard performs when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    /// Refresh the current-time slot.
    ClockTick,
    /// Generate a vehicle detection and a goods loading event.
    SimulationTick,
    /// Return the gate display to its idle state.
    IdleReset,
    /// Flush per-interval counters into the rolling charts.
    ChartFeed,
}

/// Opaque handle for a registered timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A job that fired, with the virtual instant it fired at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    /// Timer that produced the job.
    pub timer: TimerId,
    /// The job to run.
    pub job: Job,
    /// Virtual time the job was due.
    pub at: Duration,
}

/// Errors returned when registering timers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// A periodic timer was registered with a zero period.
    #[error("periodic timer for {job:?} needs a non-zero period")]
    ZeroPeriod {
        /// The job that was being registered.
        job: Job,
    },

    /// The due time does not fit in a [`Duration`].
    #[error("virtual clock overflow scheduling {job:?}")]
    Overflow {
        /// The job that was being registered.
        job: Job,
    },
}

/// Registers periodic and one-shot jobs and releases them as time advances.
pub trait Scheduler {
    /// Current virtual time since the scheduler was created.
    fn now(&self) -> Duration;

    /// Register a job to fire every `period`, first at `now + period`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if `period` is zero or the due time overflows.
    fn schedule_periodic(&mut self, period: Duration, job: Job) -> Result<TimerId, SchedulerError>;

    /// Register a job to fire once at `now + delay`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Overflow`] if the due time overflows.
    fn schedule_once(&mut self, delay: Duration, job: Job) -> Result<TimerId, SchedulerError>;

    /// Cancel a timer. Returns `false` if it already fired (one-shot) or
    /// was never registered.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Due time of the earliest live timer, if any.
    fn next_due(&self) -> Option<Duration>;

    /// Release the earliest job due at or before `until`, moving `now`
    /// to its due time. Returns `None` once nothing is due by `until`.
    fn fire_next(&mut self, until: Duration) -> Option<Fired>;

    /// Move `now` forward to `until` without firing anything. Never moves
    /// time backwards.
    fn settle(&mut self, until: Duration);
}

/// A registered timer.
#[derive(Debug, Clone, Copy)]
struct Timer {
    job: Job,
    period: Option<Duration>,
}

/// Heap key: due time first, registration order second.
type QueueKey = Reverse<(Duration, u64)>;

/// In-memory [`Scheduler`] over a manually advanced virtual clock.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, Timer>,
    queue: BinaryHeap<QueueKey>,
}

impl VirtualScheduler {
    /// Create an empty scheduler at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    fn register(&mut self, due: Duration, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.timers.insert(id, timer);
        self.queue.push(Reverse((due, id.0)));
        id
    }

    /// Drop heap entries whose timers were cancelled.
    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, raw))) = self.queue.peek() {
            if self.timers.contains_key(&TimerId(*raw)) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule_periodic(&mut self, period: Duration, job: Job) -> Result<TimerId, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod { job });
        }
        let due = self
            .now
            .checked_add(period)
            .ok_or(SchedulerError::Overflow { job })?;
        Ok(self.register(
            due,
            Timer {
                job,
                period: Some(period),
            },
        ))
    }

    fn schedule_once(&mut self, delay: Duration, job: Job) -> Result<TimerId, SchedulerError> {
        let due = self
            .now
            .checked_add(delay)
            .ok_or(SchedulerError::Overflow { job })?;
        Ok(self.register(due, Timer { job, period: None }))
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(&id).is_some();
        if removed {
            self.discard_cancelled();
        }
        removed
    }

    fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|Reverse((_, raw))| self.timers.contains_key(&TimerId(*raw)))
            .map(|Reverse((due, _))| *due)
            .min()
    }

    fn fire_next(&mut self, until: Duration) -> Option<Fired> {
        self.discard_cancelled();
        let Reverse((due, raw)) = *self.queue.peek()?;
        if due > until {
            return None;
        }
        self.queue.pop();
        let id = TimerId(raw);
        let timer = *self.timers.get(&id)?;
        if due > self.now {
            self.now = due;
        }

        match timer.period.and_then(|period| due.checked_add(period)) {
            Some(next) => self.queue.push(Reverse((next, raw))),
            None => {
                self.timers.remove(&id);
            }
        }

        Some(Fired {
            timer: id,
            job: timer.job,
            at: due,
        })
    }

    fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn drain(sched: &mut VirtualScheduler, until: Duration) -> Vec<(Job, u64)> {
        let mut out = Vec::new();
        while let Some(fired) = sched.fire_next(until) {
            out.push((fired.job, fired.at.as_secs()));
        }
        sched.settle(until);
        out
    }

    #[test]
    fn periodic_fires_every_period() {
        let mut sched = VirtualScheduler::new();
        sched.schedule_periodic(secs(10), Job::SimulationTick).unwrap();
        let fired = drain(&mut sched, secs(35));
        assert_eq!(
            fired,
            vec![
                (Job::SimulationTick, 10),
                (Job::SimulationTick, 20),
                (Job::SimulationTick, 30),
            ]
        );
        assert_eq!(sched.now(), secs(35));
        assert_eq!(sched.next_due(), Some(secs(40)));
    }

    #[test]
    fn one_shot_fires_once() {
        let mut sched = VirtualScheduler::new();
        sched.schedule_once(secs(7), Job::IdleReset).unwrap();
        assert_eq!(drain(&mut sched, secs(100)), vec![(Job::IdleReset, 7)]);
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.next_due(), None);
    }

    #[test]
    fn equal_deadlines_fire_in_registration_order() {
        let mut sched = VirtualScheduler::new();
        sched.schedule_periodic(secs(10), Job::SimulationTick).unwrap();
        sched.schedule_periodic(secs(30), Job::ChartFeed).unwrap();
        let fired = drain(&mut sched, secs(30));
        assert_eq!(
            fired,
            vec![
                (Job::SimulationTick, 10),
                (Job::SimulationTick, 20),
                (Job::SimulationTick, 30),
                (Job::ChartFeed, 30),
            ]
        );
    }

    #[test]
    fn one_shot_registered_mid_run_is_relative_to_now() {
        let mut sched = VirtualScheduler::new();
        sched.schedule_periodic(secs(10), Job::SimulationTick).unwrap();
        let first = sched.fire_next(secs(100)).unwrap();
        assert_eq!(first.at, secs(10));
        sched.schedule_once(secs(7), Job::IdleReset).unwrap();
        assert_eq!(sched.next_due(), Some(secs(17)));
        let next = sched.fire_next(secs(100)).unwrap();
        assert_eq!((next.job, next.at), (Job::IdleReset, secs(17)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut sched = VirtualScheduler::new();
        let tick = sched.schedule_periodic(secs(10), Job::SimulationTick).unwrap();
        sched.schedule_periodic(secs(30), Job::ChartFeed).unwrap();
        assert!(sched.cancel(tick));
        assert!(!sched.cancel(tick));
        assert_eq!(drain(&mut sched, secs(60)), vec![(Job::ChartFeed, 30), (Job::ChartFeed, 60)]);
    }

    #[test]
    fn zero_period_rejected() {
        let mut sched = VirtualScheduler::new();
        let result = sched.schedule_periodic(Duration::ZERO, Job::ClockTick);
        assert_eq!(result, Err(SchedulerError::ZeroPeriod { job: Job::ClockTick }));
    }

    #[test]
    fn settle_never_rewinds() {
        let mut sched = VirtualScheduler::new();
        sched.settle(secs(5));
        sched.settle(secs(2));
        assert_eq!(sched.now(), secs(5));
    }
}
