//! Per-actor mailbox: an MPSC facade over the SPSC ring.
//!
//! The ring underneath supports exactly one producer and one consumer.
//! Mailboxes are written from arbitrary sender threads, so the producer
//! side is serialized behind a short critical section — the lock is held
//! only across the single ring push, not across any user code.

pub mod metrics;

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use thiserror::Error;

// Layer 3: Internal module imports
use crate::message::Message;
use crate::ring::{self, Consumer, Producer, RingError};

pub use metrics::MailboxMetrics;

/// Errors raised by mailbox construction or enqueue.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    /// The requested capacity was rejected by the underlying ring.
    #[error(transparent)]
    InvalidCapacity(#[from] RingError),
}

/// The result of [`Mailbox::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The message was queued. `should_schedule` is `true` exactly when
    /// this call transitioned `pending` from false to true — the caller
    /// is then responsible for publishing a drain task.
    Delivered { should_schedule: bool },
    /// The ring was full; the sender must choose its own back-pressure
    /// policy (retry, drop, or surface the error).
    Full,
}

/// A single actor's inbox.
///
/// Holds exactly one SPSC ring plus the `pending` flag that models
/// "a drain task for this actor is scheduled or executing." Enqueue is the
/// only place `pending` flips false -> true; `mark_idle` is the only place
/// it flips true -> false. As long as those two stay paired, a drain task
/// for this actor is either sitting in some scheduler queue or currently
/// executing whenever `pending` reads true.
pub struct Mailbox {
    producer: Mutex<Producer<Message>>,
    consumer: Mutex<Consumer<Message>>,
    pending: AtomicBool,
    metrics: MailboxMetrics,
}

impl Mailbox {
    /// Create a mailbox backed by a ring of the given power-of-two
    /// capacity.
    pub fn new(capacity: u32) -> Result<Self, MailboxError> {
        let (producer, consumer) = ring::channel(capacity)?;
        Ok(Self {
            producer: Mutex::new(producer),
            consumer: Mutex::new(consumer),
            pending: AtomicBool::new(false),
            metrics: MailboxMetrics::default(),
        })
    }

    /// Enqueue a message from an arbitrary sender thread.
    ///
    /// Enqueues from multiple threads are linearizable and FIFO within any
    /// one sender; FIFO across distinct senders is not guaranteed (the
    /// interleaving is whichever caller acquires the critical section
    /// first).
    pub fn enqueue(&self, msg: Message) -> EnqueueOutcome {
        let delivered = {
            let mut producer = self.producer.lock();
            producer.push(msg).is_ok()
        };
        if !delivered {
            self.metrics.record_full();
            return EnqueueOutcome::Full;
        }
        self.metrics.record_enqueued();
        let was_pending = self.pending.swap(true, Ordering::AcqRel);
        EnqueueOutcome::Delivered {
            should_schedule: !was_pending,
        }
    }

    /// Pop one message. Must only be called by the worker currently
    /// draining this actor — the scheduler's drain-exclusivity protocol
    /// guarantees that, not this type.
    pub fn drain_one(&self) -> Option<Message> {
        let msg = self.consumer.lock().pop();
        if msg.is_some() {
            self.metrics.record_dequeued();
        }
        msg
    }

    /// Clear `pending` if the queue looks empty, re-checking afterwards to
    /// guard against a sender enqueuing in the gap between the check and
    /// the clear. Returns whether the caller must publish a fresh drain
    /// task.
    ///
    /// This is the single choke point enforcing **I-PENDING** /
    /// **I-DRAIN-EXCLUSIVE**: a naive "clear then check" would let a
    /// concurrent `enqueue` see `pending == false`, flip it back to `true`
    /// and schedule its own task, while this call *also* sees non-empty
    /// and schedules a second one — two live drain tasks for one actor.
    /// The race is resolved with a CAS: if a sender slipped in after the
    /// clear, exactly one of {that sender's `enqueue`, this `mark_idle`}
    /// wins the compare-exchange back to `true` and is the one responsible
    /// for re-arming; the loser must not schedule anything.
    pub fn mark_idle(&self) -> bool {
        if !self.is_empty() {
            return true;
        }
        self.pending.store(false, Ordering::Release);
        if self.is_empty() {
            return false;
        }
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// `true` if a drain task for this actor is scheduled or executing.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Current queue depth.
    pub fn len(&self) -> u32 {
        self.consumer.lock().len()
    }

    /// `true` if the queue holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ring capacity this mailbox was created with.
    pub fn capacity(&self) -> u32 {
        self.producer.lock().capacity()
    }

    /// Lifetime enqueue/dequeue/full counters for this mailbox.
    pub fn metrics(&self) -> &MailboxMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ActorId;

    fn msg() -> Message {
        Message::user(ActorId::next(0), ActorId::next(0))
    }

    #[test]
    fn first_enqueue_requests_scheduling() {
        let mailbox = Mailbox::new(4).expect("power of two");
        let outcome = mailbox.enqueue(msg());
        assert_eq!(
            outcome,
            EnqueueOutcome::Delivered {
                should_schedule: true
            }
        );
    }

    #[test]
    fn second_enqueue_while_pending_does_not_reschedule() {
        let mailbox = Mailbox::new(4).expect("power of two");
        mailbox.enqueue(msg());
        let outcome = mailbox.enqueue(msg());
        assert_eq!(
            outcome,
            EnqueueOutcome::Delivered {
                should_schedule: false
            }
        );
    }

    #[test]
    fn full_at_capacity_plus_one() {
        let mailbox = Mailbox::new(4).expect("power of two");
        for _ in 0..4 {
            assert!(matches!(
                mailbox.enqueue(msg()),
                EnqueueOutcome::Delivered { .. }
            ));
        }
        assert_eq!(mailbox.enqueue(msg()), EnqueueOutcome::Full);
    }

    #[test]
    fn one_dequeue_makes_room_again() {
        let mailbox = Mailbox::new(4).expect("power of two");
        for _ in 0..4 {
            mailbox.enqueue(msg());
        }
        assert!(mailbox.drain_one().is_some());
        assert!(matches!(
            mailbox.enqueue(msg()),
            EnqueueOutcome::Delivered { .. }
        ));
    }

    #[test]
    fn mark_idle_reports_whether_more_work_remains() {
        let mailbox = Mailbox::new(4).expect("power of two");
        mailbox.enqueue(msg());
        mailbox.enqueue(msg());
        mailbox.drain_one();
        assert!(mailbox.mark_idle());
        assert!(mailbox.is_pending());
    }

    #[test]
    fn mark_idle_reports_empty_when_drained() {
        let mailbox = Mailbox::new(4).expect("power of two");
        mailbox.enqueue(msg());
        mailbox.drain_one();
        assert!(!mailbox.mark_idle());
    }

    #[test]
    fn fifo_within_one_producer() {
        let mailbox = Mailbox::new(8).expect("power of two");
        let sender = ActorId::next(0);
        let receiver = ActorId::next(0);
        let mut sent_ids = Vec::new();
        for _ in 0..5 {
            let m = Message::user(sender, receiver);
            sent_ids.push(m.monotonic_id);
            mailbox.enqueue(m);
        }
        let mut received_ids = Vec::new();
        while let Some(m) = mailbox.drain_one() {
            received_ids.push(m.monotonic_id);
        }
        assert_eq!(sent_ids, received_ids);
    }
}
