//! The supervision contract: what happens when `Behavior::receive` errors.
//!
//! A [`Supervisor`] maps `(actor, error)` to one of four directives
//! ([`SupervisorStrategy`]). The core does not route by error type — there
//! is one configured strategy per system, applied uniformly — so
//! [`DefaultSupervisor`] simply returns its configured strategy. Restart
//! rate-limiting and backoff are layered on top by the actor itself (see
//! [`backoff::RestartBackoff`]), not by the supervisor: the supervisor
//! answers "what kind of response", the actor answers "is this restart
//! still within budget".

pub mod backoff;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::ActorId;

pub use backoff::RestartBackoff;

/// The four responses a supervisor may give when behavior raises an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupervisorStrategy {
    /// Ignore the error; keep processing subsequent messages.
    Resume,
    /// Rebuild the actor's behavior in place (subject to restart-rate
    /// limiting; exceeding the limit escalates).
    Restart,
    /// Stop the actor: run `post_stop`, transition to `Stopped`, unregister.
    Stop,
    /// Forward the decision to the parent's supervisor; with no parent,
    /// the system's root policy (default [`SupervisorStrategy::Stop`])
    /// applies.
    Escalate,
}

/// Decides how an actor should respond to an error raised by its behavior.
///
/// Implementations are shared (`Arc<dyn Supervisor>`) across every actor
/// under the same policy, so `decide` must not mutate per-actor state —
/// restart counting lives on the actor, not here.
pub trait Supervisor: Send + Sync {
    /// Decide how `actor` should respond to `error`.
    fn decide(
        &self,
        actor: ActorId,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    ) -> SupervisorStrategy;
}

/// The system's root supervisor: always returns the configured strategy,
/// uninfluenced by the error's type or the actor's identity.
#[derive(Debug, Clone, Copy)]
pub struct DefaultSupervisor {
    strategy: SupervisorStrategy,
}

impl DefaultSupervisor {
    pub fn new(strategy: SupervisorStrategy) -> Self {
        Self { strategy }
    }
}

impl Supervisor for DefaultSupervisor {
    fn decide(
        &self,
        _actor: ActorId,
        _error: &(dyn std::error::Error + Send + Sync + 'static),
    ) -> SupervisorStrategy {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Boom;
    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }
    impl std::error::Error for Boom {}

    #[test]
    fn default_supervisor_ignores_error_identity() {
        let sup = DefaultSupervisor::new(SupervisorStrategy::Restart);
        let id = ActorId::next(0);
        assert_eq!(sup.decide(id, &Boom), SupervisorStrategy::Restart);
    }
}
