//! Deadline timers evaluated on each coordinator tick.
//!
//! A timer is a single optional deadline plus a generation counter. Every
//! schedule and cancel bumps the generation, so a deadline observed under an
//! old generation can never fire after a cancel.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deadline {
    at: Instant,
    generation: u64,
}

/// A cancellable one-shot deadline.
#[derive(Debug, Default)]
pub struct Timer {
    pending: Option<Deadline>,
    generation: u64,
}

impl Timer {
    pub const fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }

    /// Schedule the timer to fire `after` from `now`, replacing any pending
    /// deadline. Returns the generation of the new deadline.
    pub fn schedule(&mut self, now: Instant, after: Duration) -> u64 {
        self.generation += 1;
        self.pending = Some(Deadline {
            at: now + after,
            generation: self.generation,
        });
        self.generation
    }

    /// Cancel the pending deadline, if any.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.pending.take().is_some()
    }

    /// Fire if the deadline has passed. A fired timer is no longer pending.
    ///
    /// Returns the generation of the deadline that fired.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        let deadline = self.pending?;
        if deadline.generation != self.generation || now < deadline.at {
            return None;
        }
        self.pending = None;
        Some(deadline.generation)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|deadline| deadline.at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_at_deadline() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        let generation = timer.schedule(t0, Duration::from_secs(2));

        assert_eq!(timer.poll(t0 + Duration::from_millis(1999)), None);
        assert_eq!(timer.poll(t0 + Duration::from_secs(2)), Some(generation));
        assert_eq!(timer.poll(t0 + Duration::from_secs(3)), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn cancel_prevents_firing() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        timer.schedule(t0, Duration::from_secs(1));

        assert!(timer.cancel());
        assert_eq!(timer.poll(t0 + Duration::from_secs(5)), None);
        assert!(!timer.cancel());
    }

    #[test]
    fn rescheduling_replaces_the_deadline() {
        let t0 = Instant::now();
        let mut timer = Timer::new();
        let first = timer.schedule(t0, Duration::from_secs(1));
        let second = timer.schedule(t0, Duration::from_secs(3));

        assert!(second > first);
        assert_eq!(timer.poll(t0 + Duration::from_secs(2)), None);
        assert_eq!(timer.remaining(t0 + Duration::from_secs(2)), Some(Duration::from_secs(1)));
        assert_eq!(timer.poll(t0 + Duration::from_secs(3)), Some(second));
    }
}
