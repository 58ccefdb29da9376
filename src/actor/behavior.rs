//! User-supplied behavior: the only part of an actor the caller writes.

// Layer 3: Internal module imports
use crate::actor::context::ActorContext;
use crate::message::Message;

/// Polymorphic user code driven by an actor's drain loop.
///
/// Only [`Behavior::receive`] is required; the lifecycle hooks default to
/// no-ops. `pre_restart`/`post_restart` run around a supervisor-ordered
/// restart, `pre_start`/`post_stop` around normal startup and shutdown.
pub trait Behavior: Send + 'static {
    /// The error type `receive` (and the lifecycle hooks) may fail with.
    /// Wrapped and handed to the supervisor contract — never propagated
    /// out of a drain call.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Handle one message. Called at most once at a time for a given
    /// actor, in mailbox FIFO order within any one sender.
    fn receive(&mut self, ctx: &mut ActorContext<'_>, msg: &Message) -> Result<(), Self::Error>;

    /// Runs once while the actor is `Starting`, before it accepts messages.
    fn pre_start(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Runs once while the actor is `Stopping`, after its last message.
    fn post_stop(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Runs just before a supervisor-ordered restart replaces this
    /// behavior value with a freshly constructed one.
    fn pre_restart(&mut self, _ctx: &mut ActorContext<'_>, _reason: &Self::Error) {}

    /// Runs on the freshly constructed behavior value, just after a
    /// supervisor-ordered restart.
    fn post_restart(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}
