//! The actor lifecycle state machine: an 8-bit atomic, transitioned by CAS.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU8, Ordering};

// Layer 2: Third-party crate imports
use thiserror::Error;

/// A point in an actor's life.
///
/// `Created -> Starting -> Running -> Stopping -> Stopped`, with `Failed`
/// reachable as a terminal error state from `Running`, and `Restarting` a
/// transient state used only while the supervisor rebuilds behavior state
/// in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActorState {
    Created = 0,
    Starting = 1,
    Running = 2,
    Restarting = 3,
    Stopping = 4,
    Stopped = 5,
    Failed = 6,
}

impl ActorState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Created,
            1 => Self::Starting,
            2 => Self::Running,
            3 => Self::Restarting,
            4 => Self::Stopping,
            5 => Self::Stopped,
            _ => Self::Failed,
        }
    }
}

/// An attempted transition that the state machine does not allow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot transition actor from {from:?} to {to:?}")]
pub struct InvalidStateTransition {
    pub from: ActorState,
    pub to: ActorState,
}

fn is_legal(from: ActorState, to: ActorState) -> bool {
    use ActorState::*;
    matches!(
        (from, to),
        (Created, Starting)
            | (Created, Stopping)
            | (Starting, Running)
            | (Starting, Failed)
            | (Starting, Stopping)
            | (Running, Stopping)
            | (Running, Restarting)
            | (Running, Failed)
            | (Restarting, Running)
            | (Restarting, Stopping)
            | (Restarting, Failed)
            | (Stopping, Stopped)
            | (Stopping, Failed)
            // stop is idempotent: stopping an already-stopped actor is a no-op, not an error
            | (Stopped, Stopped)
    )
}

/// An atomic cell holding an [`ActorState`], transitioned only by
/// compare-and-swap. Never branch on a relaxed load and then act on it —
/// always go through [`ActorStateCell::transition`].
#[derive(Debug)]
pub struct ActorStateCell(AtomicU8);

impl ActorStateCell {
    pub fn new(initial: ActorState) -> Self {
        Self(AtomicU8::new(initial as u8))
    }

    pub fn load(&self) -> ActorState {
        ActorState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Attempt `from -> to`. Fails without mutating state if the current
    /// state is not exactly `from`, or if `from -> to` is not a legal edge.
    pub fn transition(
        &self,
        from: ActorState,
        to: ActorState,
    ) -> Result<(), InvalidStateTransition> {
        if !is_legal(from, to) {
            return Err(InvalidStateTransition { from, to });
        }
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|actual| InvalidStateTransition {
                from: ActorState::from_u8(actual),
                to,
            })
    }

    /// Force-set the state unconditionally. Used only for the
    /// `Stopped -> Stopped` idempotent no-op and by tests.
    pub fn force(&self, to: ActorState) {
        self.0.store(to as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_created() {
        let cell = ActorStateCell::new(ActorState::Created);
        assert_eq!(cell.load(), ActorState::Created);
    }

    #[test]
    fn legal_transition_succeeds() {
        let cell = ActorStateCell::new(ActorState::Created);
        cell.transition(ActorState::Created, ActorState::Starting)
            .expect("legal");
        assert_eq!(cell.load(), ActorState::Starting);
    }

    #[test]
    fn illegal_transition_is_rejected_not_panicked() {
        let cell = ActorStateCell::new(ActorState::Created);
        let err = cell
            .transition(ActorState::Created, ActorState::Running)
            .unwrap_err();
        assert_eq!(err.from, ActorState::Created);
        assert_eq!(err.to, ActorState::Running);
        // state unchanged
        assert_eq!(cell.load(), ActorState::Created);
    }

    #[test]
    fn stale_from_is_rejected() {
        let cell = ActorStateCell::new(ActorState::Created);
        cell.transition(ActorState::Created, ActorState::Starting)
            .expect("legal");
        let err = cell
            .transition(ActorState::Created, ActorState::Starting)
            .unwrap_err();
        assert_eq!(err.from, ActorState::Starting);
    }

    #[test]
    fn stop_is_idempotent() {
        let cell = ActorStateCell::new(ActorState::Stopped);
        cell.transition(ActorState::Stopped, ActorState::Stopped)
            .expect("idempotent no-op");
    }
}
