//! # airssys-rt — in-process actor runtime
//!
//! A high-throughput, synchronous actor runtime for building fault-tolerant
//! concurrent applications within a single process. Actors communicate by
//! sending fixed-size [`message::Message`] values through per-actor
//! [`mailbox::Mailbox`]es, driven by a work-stealing [`scheduler::Scheduler`]
//! over a pool of OS threads.
//!
//! # Quick Start
//!
//! ```rust
//! use airssys_rt::prelude::*;
//!
//! struct Counter {
//!     count: u64,
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("counter failure")]
//! struct CounterError;
//!
//! impl Behavior for Counter {
//!     type Error = CounterError;
//!
//!     fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), Self::Error> {
//!         self.count += 1;
//!         Ok(())
//!     }
//! }
//!
//! fn main() {
//!     let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
//!     system.start().expect("scheduler starts");
//!
//!     let counter = system
//!         .spawn(Counter { count: 0 }, SpawnOptions::default())
//!         .expect("spawns");
//!     counter
//!         .send(Message::user(counter.id(), counter.id()))
//!         .expect("delivered");
//!
//!     system.shutdown().expect("shuts down cleanly");
//! }
//! ```
//!
//! # Design
//!
//! - [`message`] — the 64-byte, `Copy` [`message::Message`] value moved
//!   through the runtime without allocation.
//! - [`ring`] — the lock-free SPSC ring buffer underlying every queue in
//!   the crate.
//! - [`mailbox`] — the per-actor inbox: an MPSC facade built from one ring
//!   plus a short producer-side critical section.
//! - [`actor`] — the [`actor::Behavior`] trait user code implements, the
//!   [`actor::ActorCore`] state machine that drives it, and the
//!   [`actor::ActorCell`] object-safe face the scheduler sees.
//! - [`scheduler`] — per-worker run-queues, a global overflow queue, and
//!   work-stealing dispatch of drain tasks.
//! - [`supervisor`] — the four-directive supervision contract
//!   ([`supervisor::SupervisorStrategy`]) and restart rate-limiting with
//!   exponential backoff.
//! - [`system`] — [`system::ActorSystem`], the top-level coordinator:
//!   configuration, spawn/stop/shutdown, and the actor registry.
//! - [`util`] — shared primitives: [`util::ActorId`], cache-line padding,
//!   `serde` helpers.
//!
//! # Logging
//!
//! The runtime emits [`tracing`] events at actor start/stop/restart and
//! scheduler lifecycle transitions. Applications install their own
//! subscriber; the crate never initializes one itself.

pub mod actor;
pub mod mailbox;
pub mod message;
pub mod prelude;
pub mod ring;
pub mod scheduler;
pub mod supervisor;
pub mod system;
pub mod util;

pub use actor::{
    ActorCell, ActorContext, ActorCore, ActorError, ActorMetrics, ActorMetricsSnapshot,
    ActorState, Behavior,
};
pub use mailbox::{EnqueueOutcome, Mailbox, MailboxError, MailboxMetrics};
pub use message::{ControlSignal, Message, MessageError, MessageKind};
pub use scheduler::{DrainTask, Scheduler, SchedulerConfig, SchedulerError};
pub use supervisor::{DefaultSupervisor, RestartBackoff, Supervisor, SupervisorStrategy};
pub use system::{ActorRef, ActorSystem, SpawnOptions, SystemConfig, SystemError};
pub use util::ActorId;
