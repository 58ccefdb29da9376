//! Lock-free mailbox counters.
//!
//! Authoritative per-mailbox counters, updated only at their single choke
//! points (enqueue success, enqueue-full, dequeue) so end-to-end scenario
//! totals can be checked against them directly.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime counters for one [`super::Mailbox`].
///
/// All operations use relaxed ordering: these are statistics, not
/// synchronization.
#[derive(Debug, Default)]
pub struct MailboxMetrics {
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    full: AtomicU64,
}

impl MailboxMetrics {
    pub(super) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_dequeued(&self) {
        self.dequeued.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_full(&self) {
        self.full.fetch_add(1, Ordering::Relaxed);
    }

    /// Total messages ever accepted into the ring.
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Total messages ever popped by the drainer.
    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Total enqueue attempts rejected because the ring was full.
    pub fn full(&self) -> u64 {
        self.full.load(Ordering::Relaxed)
    }
}
