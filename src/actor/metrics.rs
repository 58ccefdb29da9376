//! Lifetime counters for one actor.
//!
//! Updated only at the choke points named in the crate's design notes on
//! stats accuracy: enqueue-success, drain-success, the stopping-policy
//! discard path, and the supervision hand-off. Relaxed ordering throughout;
//! these are statistics, not synchronization.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime counters for one [`super::ActorCore`].
#[derive(Debug, Default)]
pub struct ActorMetrics {
    messages_received: AtomicU64,
    messages_processed: AtomicU64,
    messages_dropped_on_stop: AtomicU64,
    behavior_errors: AtomicU64,
    restarts: AtomicU64,
}

/// A point-in-time snapshot of [`ActorMetrics`], cheap to copy and compare
/// in tests (property P5: conservation of messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActorMetricsSnapshot {
    pub messages_received: u64,
    pub messages_processed: u64,
    pub messages_dropped_on_stop: u64,
    pub behavior_errors: u64,
    pub restarts: u64,
}

impl ActorMetrics {
    pub(super) fn record_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_processed(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_dropped_on_stop(&self) {
        self.messages_dropped_on_stop.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_behavior_error(&self) {
        self.behavior_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_restart(&self) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ActorMetricsSnapshot {
        ActorMetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_processed: self.messages_processed.load(Ordering::Relaxed),
            messages_dropped_on_stop: self.messages_dropped_on_stop.load(Ordering::Relaxed),
            behavior_errors: self.behavior_errors.load(Ordering::Relaxed),
            restarts: self.restarts.load(Ordering::Relaxed),
        }
    }
}
