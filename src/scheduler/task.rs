//! The unit of work the scheduler moves around: "drain this actor."

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::actor::ActorCell;

/// A scheduled invitation to drain one actor's mailbox.
///
/// The scheduler schedules drain tasks, not messages: one task means "pop
/// up to a batch of messages from this actor and process them," however
/// many happen to be queued when the worker gets to it.
#[derive(Clone)]
pub struct DrainTask {
    pub(crate) actor: Arc<dyn ActorCell>,
    /// Snapshot of the mailbox's `pending` flag at publication time. The
    /// executing worker re-checks this against the actor's *current*
    /// `is_pending()` and drops the task without draining if the flag has
    /// since gone false — that only happens when another drain already ran
    /// and re-armed (or found nothing to re-arm), so this task's work is
    /// already done.
    pub(crate) token: bool,
}

impl DrainTask {
    pub(crate) fn new(actor: Arc<dyn ActorCell>) -> Self {
        let token = actor.is_pending();
        Self { actor, token }
    }
}

/// Errors raised when publishing a [`DrainTask`] to the scheduler.
#[derive(Debug, Error, Clone)]
pub enum SchedulerError {
    /// Both the target worker-local queue and the global overflow queue
    /// were full. The caller (typically an actor re-arming its own drain
    /// task) must back off and retry — dropping the task would violate
    /// the guarantee that a pending mailbox always has a task somewhere.
    #[error("worker-local and global run queues are both full")]
    Overflow,
}
