//! Actor system coordination: configuration, the shared registry/scheduler
//! handle, and the top-level `ActorSystem` API.

pub mod actor_system;
pub mod config;
pub mod errors;
pub mod handle;

pub use actor_system::{ActorRef, ActorSystem, SpawnOptions};
pub use config::{
    SystemConfig, SystemConfigBuilder, DEFAULT_BACKOFF_INITIAL, DEFAULT_BACKOFF_MAX,
    DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_BATCH_SIZE, DEFAULT_GLOBAL_QUEUE_CAPACITY,
    DEFAULT_MAILBOX_CAPACITY, DEFAULT_MAX_RESTARTS, DEFAULT_RESTART_WINDOW, DEFAULT_SPIN_CYCLES,
    DEFAULT_WORKER_QUEUE_CAPACITY,
};
pub use errors::SystemError;
pub use handle::SystemHandle;
