//! Cooperative debounce for live search.
//!
//! Every keystroke calls [`Debouncer::trigger`], which cancels any pending
//! deadline and starts the quiet interval again. The event loop calls
//! [`Debouncer::poll`]; it returns `true` exactly once, the first time it is
//! polled after the interval has elapsed without a new trigger. Time is
//! passed in explicitly so the debouncer never sleeps or spawns anything.

use std::time::{Duration, Instant};

/// Quiet interval used by the live search box.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiet interval from `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop a pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending deadline, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns `true` once when the deadline has passed, then disarms.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_after_quiet_interval() {
        let start = Instant::now();
        let mut d = Debouncer::default();
        assert!(!d.poll(start));

        d.trigger(start);
        assert!(d.is_pending());
        assert!(!d.poll(start + 299 * MS));
        assert!(d.poll(start + 300 * MS));
        assert!(!d.poll(start + 301 * MS));
        assert!(!d.is_pending());
    }

    #[test]
    fn retrigger_restarts_the_interval() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.trigger(start);
        d.trigger(start + 80 * MS);
        assert!(!d.poll(start + 120 * MS));
        assert_eq!(d.remaining(start + 120 * MS), Some(60 * MS));
        assert!(d.poll(start + 180 * MS));
    }

    #[test]
    fn cancel_disarms_without_firing() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.trigger(start);
        d.cancel();
        assert!(!d.poll(start + 50 * MS));
        assert_eq!(d.remaining(start), None);
    }
}
