//! Trailing-edge debounce timer driven by the event loop.

use std::time::{Duration, Instant};

/// Fires once `delay` has elapsed since the most recent `schedule` call
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the timer fires, if armed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true exactly once per armed period, when the deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
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

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(500));
        assert!(!d.fire_if_due(start));

        d.schedule(start);
        assert!(d.is_pending());
        assert!(!d.fire_if_due(start + Duration::from_millis(499)));
        assert!(d.fire_if_due(start + Duration::from_millis(500)));
        // only once
        assert!(!d.fire_if_due(start + Duration::from_millis(600)));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_reschedule_extends_deadline() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(500));
        d.schedule(start);
        d.schedule(start + Duration::from_millis(400));
        assert!(!d.fire_if_due(start + Duration::from_millis(600)));
        assert_eq!(
            d.remaining(start + Duration::from_millis(600)),
            Some(Duration::from_millis(300))
        );
        assert!(d.fire_if_due(start + Duration::from_millis(900)));
    }
}
