//! Restart rate limiting and exponential backoff.
//!
//! Tracks restart history in a sliding time window and enforces the
//! `max_restarts` / `restart_window` limit, producing an exponentially
//! growing delay (capped at `backoff_max`) between consecutive restarts so
//! a crash-looping actor doesn't spin the worker that drains it.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Per-actor restart history and backoff state.
#[derive(Debug, Clone)]
pub struct RestartBackoff {
    max_restarts: u32,
    restart_window: Duration,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    history: VecDeque<Instant>,
    consecutive: u32,
}

impl RestartBackoff {
    pub fn new(
        max_restarts: u32,
        restart_window: Duration,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    ) -> Self {
        Self {
            max_restarts,
            restart_window,
            initial_delay,
            max_delay,
            multiplier,
            history: VecDeque::new(),
            consecutive: 0,
        }
    }

    fn evict_expired(&mut self, now: Instant) {
        while let Some(&oldest) = self.history.front() {
            if now.duration_since(oldest) > self.restart_window {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record a restart attempt now.
    pub fn record_restart(&mut self) {
        let now = Instant::now();
        self.evict_expired(now);
        self.history.push_back(now);
        self.consecutive += 1;
    }

    /// Whether restarts within the sliding window have hit `max_restarts`.
    pub fn is_limit_exceeded(&mut self) -> bool {
        self.evict_expired(Instant::now());
        self.history.len() as u32 > self.max_restarts
    }

    /// The delay to wait before performing the next restart:
    /// `initial_delay * multiplier^(consecutive - 1)`, capped at `max_delay`.
    pub fn calculate_delay(&self) -> Duration {
        let exponent = self.consecutive.saturating_sub(1).min(32);
        let factor = self.multiplier.powi(exponent as i32);
        let scaled = self.initial_delay.mul_f64(factor.max(1.0));
        scaled.min(self.max_delay)
    }

    /// Reset history, e.g. after a long healthy run. Not called
    /// automatically — left for callers that want to implement their own
    /// "forgive after quiet period" policy.
    pub fn reset(&mut self) {
        self.history.clear();
        self.consecutive = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> RestartBackoff {
        RestartBackoff::new(
            3,
            Duration::from_secs(30),
            Duration::from_millis(100),
            Duration::from_secs(2),
            2.0,
        )
    }

    #[test]
    fn under_limit_is_not_exceeded() {
        let mut t = tracker();
        t.record_restart();
        t.record_restart();
        t.record_restart();
        assert!(!t.is_limit_exceeded());
    }

    #[test]
    fn exceeding_max_restarts_trips_the_limit() {
        let mut t = tracker();
        for _ in 0..4 {
            t.record_restart();
        }
        assert!(t.is_limit_exceeded());
    }

    #[test]
    fn delay_grows_exponentially_and_caps() {
        let mut t = tracker();
        t.record_restart();
        assert_eq!(t.calculate_delay(), Duration::from_millis(100));
        t.record_restart();
        assert_eq!(t.calculate_delay(), Duration::from_millis(200));
        t.record_restart();
        assert_eq!(t.calculate_delay(), Duration::from_millis(400));
        for _ in 0..10 {
            t.record_restart();
        }
        assert_eq!(t.calculate_delay(), Duration::from_secs(2));
    }

    #[test]
    fn reset_clears_history() {
        let mut t = tracker();
        t.record_restart();
        t.record_restart();
        t.reset();
        assert!(!t.is_limit_exceeded());
        assert_eq!(t.calculate_delay(), Duration::from_millis(100));
    }
}
