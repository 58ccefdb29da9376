//! Convenient single-import surface for building on top of this crate.
//!
//! ```rust
//! use airssys_rt::prelude::*;
//! ```

// Core actor system
pub use crate::actor::{ActorCell, ActorContext, ActorCore, ActorError, ActorState, Behavior};

// Messaging
pub use crate::message::{ControlSignal, Message, MessageError, MessageKind};

// Mailbox
pub use crate::mailbox::{EnqueueOutcome, Mailbox, MailboxError};

// Scheduler
pub use crate::scheduler::{Scheduler, SchedulerConfig, SchedulerError};

// Supervision
pub use crate::supervisor::{DefaultSupervisor, RestartBackoff, Supervisor, SupervisorStrategy};

// System
pub use crate::system::{ActorRef, ActorSystem, SpawnOptions, SystemConfig, SystemError};

// Utilities
pub use crate::util::ActorId;
