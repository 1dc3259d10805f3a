//! Periodic timers driven by an external clock
//!
//! The scheduler never reads a clock itself: callers pass the current
//! [`Instant`] to [`IntervalScheduler::poll`] from whatever loop they already
//! run (a frame loop on the desktop, an executor task on hardware). Each
//! elapsed timer is reported by its [`TimerHandle`], and the owner of that
//! handle reacts to it.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::debug;
use thiserror_no_std::Error;

/// Error types for scheduler operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A period of zero would fire on every poll
    #[error("Timer period must be non-zero")]
    ZeroPeriod,

    /// No free timer slot
    #[error("Timer capacity exceeded (max: {max})")]
    CapacityExceeded {
        /// Maximum number of concurrent timers
        max: usize,
    },
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Identifies one started timer.
///
/// Handles are never reused: stopping an old handle cannot cancel a timer
/// started later in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    slot: u16,
    generation: u16,
}

/// Start and stop periodic timers.
pub trait Scheduler {
    /// Start a timer firing every `period`, first at `now + period`.
    fn start(&mut self, now: Instant, period: Duration) -> SchedulerResult<TimerHandle>;

    /// Cancel a timer. Returns `false` if it was not running.
    fn stop(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    handle: TimerHandle,
    period: Duration,
    next_due: Instant,
    active: bool,
}

/// Fixed-capacity table of up to `N` periodic timers.
#[derive(Debug)]
pub struct IntervalScheduler<const N: usize> {
    timers: Vec<Timer, N>,
    next_generation: u16,
}

impl<const N: usize> Default for IntervalScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> IntervalScheduler<N> {
    pub const fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_generation: 0,
        }
    }

    /// Number of running timers
    pub fn active(&self) -> usize {
        self.timers.iter().filter(|t| t.active).count()
    }

    pub fn is_running(&self, handle: TimerHandle) -> bool {
        self.find(handle).is_some()
    }

    /// Report every timer whose deadline is at or before `now`.
    ///
    /// A timer fires at most once per poll. If several periods were missed it
    /// is rescheduled on its original cadence past `now` instead of firing
    /// once per missed period.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerHandle, N> {
        let mut fired = Vec::new();

        for timer in self.timers.iter_mut().filter(|t| t.active) {
            if timer.next_due > now {
                continue;
            }

            let overdue = (now - timer.next_due).as_ticks();
            let period = timer.period.as_ticks();
            let skipped = overdue / period;
            if skipped > 0 {
                debug!("Timer {:?} skipped {} period(s)", timer.handle, skipped);
            }
            timer.next_due += Duration::from_ticks(period * (skipped + 1));

            // `fired` has the same capacity as the timer table.
            let _ = fired.push(timer.handle);
        }

        fired
    }

    fn find(&self, handle: TimerHandle) -> Option<usize> {
        let index = handle.slot as usize;
        self.timers
            .get(index)
            .filter(|t| t.active && t.handle == handle)
            .map(|_| index)
    }

    fn bump_generation(&mut self) -> u16 {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        generation
    }
}

impl<const N: usize> Scheduler for IntervalScheduler<N> {
    fn start(&mut self, now: Instant, period: Duration) -> SchedulerResult<TimerHandle> {
        if period.as_ticks() == 0 {
            return Err(SchedulerError::ZeroPeriod);
        }

        let generation = self.bump_generation();
        let free_slot = self.timers.iter().position(|t| !t.active);
        let slot = match free_slot {
            Some(slot) => slot,
            None if self.timers.len() < N => self.timers.len(),
            None => return Err(SchedulerError::CapacityExceeded { max: N }),
        };

        let timer = Timer {
            handle: TimerHandle {
                slot: slot as u16,
                generation,
            },
            period,
            next_due: now + period,
            active: true,
        };

        if slot == self.timers.len() {
            self.timers
                .push(timer)
                .map_err(|_| SchedulerError::CapacityExceeded { max: N })?;
        } else {
            self.timers[slot] = timer;
        }

        debug!(
            "Started timer {:?} every {}ms",
            timer.handle,
            period.as_millis()
        );
        Ok(timer.handle)
    }

    fn stop(&mut self, handle: TimerHandle) -> bool {
        match self.find(handle) {
            Some(index) => {
                self.timers[index].active = false;
                debug!("Stopped timer {:?}", handle);
                true
            }
            None => false,
        }
    }
}
