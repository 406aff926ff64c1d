use std::time::{Duration, Instant};

/// How long the event loop waits for input before running due timers
pub const DEFAULT_POLL_MS: u64 = 250;

/// Countdown resolution
pub const COUNTDOWN_TICK_SECS: u64 = 1;

/// Clock display refresh
pub const CLOCK_REFRESH_SECS: u64 = 1;

/// Get the event poll duration
pub fn poll_duration() -> Duration {
    Duration::from_millis(DEFAULT_POLL_MS)
}

/// A repeating timer checked from the event loop.
///
/// Missed periods are not replayed: after a stall the timer fires once and
/// schedules the next firing one interval later.
#[derive(Debug, Clone)]
pub struct Periodic {
    interval: Duration,
    next_due: Instant,
}

impl Periodic {
    /// First firing one interval after `now`
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn every_secs(secs: u64, now: Instant) -> Self {
        Self::new(Duration::from_secs(secs.max(1)), now)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Restart the period from `now`
    pub fn reset(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }

    /// True when the timer is due at `now`; advances to the next period
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_duration() {
        assert_eq!(poll_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_periodic_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = Periodic::every_secs(1, start);

        assert!(!timer.fire(start));
        assert!(!timer.fire(start + Duration::from_millis(999)));
        assert!(timer.fire(start + Duration::from_millis(1000)));
        assert!(!timer.fire(start + Duration::from_millis(1500)));
        assert!(timer.fire(start + Duration::from_millis(2100)));
    }

    #[test]
    fn test_periodic_does_not_replay_after_stall() {
        let start = Instant::now();
        let mut timer = Periodic::every_secs(1, start);

        let late = start + Duration::from_secs(10);
        assert!(timer.fire(late));
        assert!(!timer.fire(late + Duration::from_millis(500)));
        assert!(timer.fire(late + Duration::from_secs(1)));
    }

    #[test]
    fn test_periodic_reset() {
        let start = Instant::now();
        let mut timer = Periodic::every_secs(5, start);

        timer.reset(start + Duration::from_secs(4));
        assert!(!timer.fire(start + Duration::from_secs(5)));
        assert!(timer.fire(start + Duration::from_secs(9)));
        assert_eq!(timer.interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let start = Instant::now();
        let timer = Periodic::every_secs(0, start);
        assert_eq!(timer.interval(), Duration::from_secs(1));
    }
}
