//! Timer abstraction that drives the simulation at a fixed cadence.

use std::time::Duration;

/// Upper bound on firings delivered by a single [`FixedIntervalScheduler::advance`] call.
///
/// Long stalls (a dragged window, a debugger pause) would otherwise replay
/// dozens of ticks in one frame.
const MAX_FIRINGS_PER_ADVANCE: u32 = 4;

/// Identifier of a repeating timer registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Creates a handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Host timer facility the session registers its tick callback with.
///
/// Implementations report firings back to the session through
/// `Session::on_timer`; a cancelled handle must never fire again.
pub trait Scheduler {
    /// Registers a timer that fires every `interval`.
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle;

    /// Cancels a registration. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Clone, Copy, Debug)]
struct RepeatingTimer {
    handle: TimerHandle,
    interval: Duration,
    elapsed: Duration,
}

/// Deterministic scheduler advanced by explicit time deltas.
///
/// The frame loop feeds it the measured frame time; tests feed it exact
/// intervals.
#[derive(Debug, Default)]
pub struct FixedIntervalScheduler {
    next_handle: u64,
    timers: Vec<RepeatingTimer>,
}

impl FixedIntervalScheduler {
    /// Creates a scheduler without registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every registration by `dt` and returns the handles that fired, in order.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            if timer.interval.is_zero() {
                continue;
            }

            timer.elapsed = timer.elapsed.saturating_add(dt);
            let mut firings = 0;
            while timer.elapsed >= timer.interval {
                timer.elapsed -= timer.interval;
                firings += 1;
                if firings == MAX_FIRINGS_PER_ADVANCE {
                    timer.elapsed = Duration::from_nanos(
                        (timer.elapsed.as_nanos() % timer.interval.as_nanos()) as u64,
                    );
                    break;
                }
            }
            fired.extend(std::iter::repeat(timer.handle).take(firings as usize));
        }
        fired
    }

    /// Number of live registrations.
    #[must_use]
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    /// Interval of a live registration.
    #[must_use]
    pub fn interval_of(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers
            .iter()
            .find(|timer| timer.handle == handle)
            .map(|timer| timer.interval)
    }
}

impl Scheduler for FixedIntervalScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        let handle = TimerHandle::new(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.timers.push(RepeatingTimer {
            handle,
            interval,
            elapsed: Duration::ZERO,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|timer| timer.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_elapsed_interval() {
        let mut scheduler = FixedIntervalScheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(100));

        assert!(scheduler.advance(Duration::from_millis(60)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(60)), vec![handle]);
        assert_eq!(
            scheduler.advance(Duration::from_millis(180)),
            vec![handle, handle]
        );
    }

    #[test]
    fn cancelled_timers_stop_firing() {
        let mut scheduler = FixedIntervalScheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(50));
        scheduler.cancel(handle);

        assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut scheduler = FixedIntervalScheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(100));

        let fired = scheduler.advance(Duration::from_millis(1_050));

        assert_eq!(fired.len(), MAX_FIRINGS_PER_ADVANCE as usize);
        assert!(fired.iter().all(|fired| *fired == handle));
        assert_eq!(scheduler.advance(Duration::from_millis(40)), Vec::new());
        assert_eq!(scheduler.advance(Duration::from_millis(10)), vec![handle]);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scheduler = FixedIntervalScheduler::new();
        let first = scheduler.schedule_repeating(Duration::from_millis(100));
        scheduler.cancel(first);
        let second = scheduler.schedule_repeating(Duration::from_millis(90));

        assert_ne!(first, second);
        assert_eq!(scheduler.interval_of(second), Some(Duration::from_millis(90)));
        assert_eq!(scheduler.interval_of(first), None);
    }

    #[test]
    fn zero_interval_never_fires() {
        let mut scheduler = FixedIntervalScheduler::new();
        let _ = scheduler.schedule_repeating(Duration::ZERO);

        assert!(scheduler.advance(Duration::from_secs(5)).is_empty());
    }
}
