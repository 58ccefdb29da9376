//! Errors raised at the actor boundary (send / start / stop).

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::actor::lifecycle::InvalidStateTransition;
use crate::scheduler::SchedulerError;

/// Errors surfaced by [`crate::actor::ActorCell`] operations.
#[derive(Debug, Error, Clone)]
pub enum ActorError {
    /// The mailbox ring was full; back-pressure is visible to the sender.
    #[error("mailbox is full")]
    MailboxFull,

    /// Send targeted an actor whose state is `Stopping`, `Stopped` or
    /// `Failed`.
    #[error("actor is not running")]
    ActorNotRunning,

    /// A lifecycle operation attempted an illegal state transition.
    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidStateTransition),

    /// Both the worker-local and global run queues were full when
    /// publishing a drain task. The send itself succeeded — the message
    /// is in the mailbox — but scheduling its processing must be retried.
    #[error(transparent)]
    SchedulerOverflow(#[from] SchedulerError),
}
