//! The handle behavior code uses to reach the rest of the system.

// Layer 3: Internal module imports
use crate::actor::error::ActorError;
use crate::message::Message;
use crate::system::handle::SystemHandle;
use crate::util::ActorId;

/// Passed to every [`crate::actor::Behavior`] call.
///
/// Carries this actor's own id and a cheap handle back to the system's
/// registry and scheduler, so behavior code can send to other actors
/// (e.g. replying to a sender) without holding a reference to the actor
/// system itself.
pub struct ActorContext<'a> {
    self_id: ActorId,
    system: &'a SystemHandle,
}

impl<'a> ActorContext<'a> {
    pub(crate) fn new(self_id: ActorId, system: &'a SystemHandle) -> Self {
        Self { self_id, system }
    }

    /// This actor's own id.
    pub fn self_id(&self) -> ActorId {
        self.self_id
    }

    /// Send `msg` to `receiver`. `msg.sender` is not rewritten — set it to
    /// `self.self_id()` yourself if you want the receiver to be able to
    /// reply.
    pub fn send(&self, receiver: ActorId, msg: Message) -> Result<(), ActorError> {
        self.system.send(receiver, msg)
    }

    /// Request that `receiver` stop. A no-op if `receiver` is unknown or
    /// already stopped.
    pub fn stop(&self, receiver: ActorId) {
        self.system.stop(receiver);
    }
}
