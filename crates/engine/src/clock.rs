//! Fixed-step tick source.
//!
//! Converts wall-clock instants into whole ticks. The source never sleeps;
//! the caller uses [`TickSource::time_until_next`] as its input poll timeout.

use std::time::{Duration, Instant};

use tracing::debug;

/// Ticks delivered at most by one poll after a stall (suspend, slow terminal).
pub const MAX_CATCH_UP_TICKS: u32 = 5;

#[derive(Debug, Clone)]
pub struct TickSource {
    interval: Duration,
    next: Instant,
}

impl TickSource {
    /// First tick is due one interval after `now`. A zero interval is clamped to 1ms.
    pub fn new(interval_ms: u32, now: Instant) -> Self {
        let interval = Duration::from_millis(u64::from(interval_ms.max(1)));
        Self {
            interval,
            next: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval.as_millis().min(u128::from(u32::MAX)) as u32
    }

    /// Number of whole ticks due at `now`, advancing the deadline past them.
    ///
    /// When more than the catch-up cap is due the backlog is dropped and the
    /// schedule restarts from `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }

        let behind = now.duration_since(self.next);
        let due = 1 + behind.as_nanos() / self.interval.as_nanos();
        if due > u128::from(MAX_CATCH_UP_TICKS) {
            debug!(
                due = due as u64,
                delivered = MAX_CATCH_UP_TICKS,
                "tick backlog dropped"
            );
            self.next = now + self.interval;
            return MAX_CATCH_UP_TICKS;
        }

        let due = due as u32;
        self.next += self.interval * due;
        due
    }

    /// How long until the next tick is due (zero if already overdue).
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_due_before_first_interval() {
        let t0 = Instant::now();
        let mut ticks = TickSource::new(16, t0);
        assert_eq!(ticks.poll(t0), 0);
        assert_eq!(ticks.poll(t0 + ms(15)), 0);
        assert_eq!(ticks.time_until_next(t0 + ms(10)), ms(6));
    }

    #[test]
    fn one_tick_per_interval() {
        let t0 = Instant::now();
        let mut ticks = TickSource::new(16, t0);
        assert_eq!(ticks.poll(t0 + ms(16)), 1);
        assert_eq!(ticks.poll(t0 + ms(20)), 0);
        assert_eq!(ticks.poll(t0 + ms(32)), 1);
    }

    #[test]
    fn late_poll_catches_up_without_drift() {
        let t0 = Instant::now();
        let mut ticks = TickSource::new(16, t0);
        // 50ms: ticks at 16, 32 and 48 are due; the next one stays on the 64ms grid.
        assert_eq!(ticks.poll(t0 + ms(50)), 3);
        assert_eq!(ticks.time_until_next(t0 + ms(50)), ms(14));
    }

    #[test]
    fn long_stall_is_capped() {
        let t0 = Instant::now();
        let mut ticks = TickSource::new(16, t0);
        assert_eq!(ticks.poll(t0 + ms(10_000)), MAX_CATCH_UP_TICKS);
        // Schedule restarts from the poll instant.
        assert_eq!(ticks.time_until_next(t0 + ms(10_000)), ms(16));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let t0 = Instant::now();
        let ticks = TickSource::new(0, t0);
        assert_eq!(ticks.interval_ms(), 1);
    }

    #[test]
    fn overdue_timeout_is_zero() {
        let t0 = Instant::now();
        let ticks = TickSource::new(16, t0);
        assert_eq!(ticks.time_until_next(t0 + ms(100)), Duration::ZERO);
    }
}
