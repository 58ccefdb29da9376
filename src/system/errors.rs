//! System-level error types: the exhaustive taxonomy named in the crate's
//! error handling design, plus the two ambient additions (`ActorNotFound`,
//! `InvalidConfig`) that a real configuration/registry surface needs.

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::actor::ActorError;
use crate::scheduler::SchedulerError;
use crate::util::ActorId;

/// Errors surfaced by [`super::ActorSystem`] operations.
#[derive(Debug, Error, Clone)]
pub enum SystemError {
    /// `stop`/`ActorContext::send` targeted an id absent from the
    /// registry — never spawned, or already fully reclaimed. Distinct from
    /// [`ActorError::ActorNotRunning`], which means "found but not
    /// accepting messages."
    #[error("no actor registered under {0}")]
    ActorNotFound(ActorId),

    /// A [`super::SystemConfig`] value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The system is shutting down; new spawns are rejected.
    #[error("system is shutting down")]
    ShuttingDown,

    /// An operation on a specific actor failed.
    #[error(transparent)]
    Actor(#[from] ActorError),

    /// Publishing a drain task overflowed both run queues even after the
    /// mandated retry-with-backoff.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// The scheduler could not spawn its worker OS threads at
    /// [`super::ActorSystem::start`] time. Unlike every other variant here,
    /// this is the one truly unrecoverable startup condition named in the
    /// crate's error handling design.
    #[error("failed to start scheduler: {0}")]
    StartupFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_not_found_display() {
        let id = ActorId::next(0);
        let err = SystemError::ActorNotFound(id);
        assert!(err.to_string().contains("no actor registered"));
    }

    #[test]
    fn invalid_config_display() {
        let err = SystemError::InvalidConfig("mailbox_capacity must be a power of two".into());
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn actor_error_converts() {
        let err: SystemError = ActorError::MailboxFull.into();
        assert!(matches!(err, SystemError::Actor(ActorError::MailboxFull)));
    }

    #[test]
    fn scheduler_error_converts() {
        let err: SystemError = SchedulerError::Overflow.into();
        assert!(matches!(err, SystemError::Scheduler(SchedulerError::Overflow)));
    }
}
