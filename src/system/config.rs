//! System configuration with sensible defaults.
//!
//! Every capacity is validated as a power of two at [`SystemConfig::validate`]
//! time — never at the point of use — so a misconfigured system fails fast
//! at [`super::ActorSystem::init`] rather than panicking deep inside a ring.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::supervisor::SupervisorStrategy;
use crate::system::errors::SystemError;

/// Default per-actor mailbox capacity (power of two).
pub const DEFAULT_MAILBOX_CAPACITY: u32 = 65_536;

/// Default capacity of each worker's local run-queue (power of two).
pub const DEFAULT_WORKER_QUEUE_CAPACITY: u32 = 4_096;

/// Default capacity of the scheduler's global overflow queue (power of two).
pub const DEFAULT_GLOBAL_QUEUE_CAPACITY: u32 = 32_768;

/// Default maximum messages drained per actor per dispatch.
pub const DEFAULT_BATCH_SIZE: u32 = 128;

/// Default busy-wait iterations a worker spins before yielding.
pub const DEFAULT_SPIN_CYCLES: u32 = 1_000;

/// Default restart allowance per [`DEFAULT_RESTART_WINDOW`].
pub const DEFAULT_MAX_RESTARTS: u32 = 3;

/// Default sliding window over which restarts are counted.
pub const DEFAULT_RESTART_WINDOW: Duration = Duration::from_secs(30);

/// Default delay before the first restart.
pub const DEFAULT_BACKOFF_INITIAL: Duration = Duration::from_millis(100);

/// Default upper bound on restart backoff delay.
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(2);

/// Default per-restart backoff growth factor.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// System-wide configuration for the actor runtime.
///
/// Constructed through [`SystemConfig::builder`], which validates every
/// field before handing back a `SystemConfig` — an invalid record can never
/// reach [`super::ActorSystem::init`].
///
/// # Examples
///
/// ```rust
/// use airssys_rt::system::SystemConfig;
///
/// let config = SystemConfig::default();
/// assert_eq!(config.mailbox_capacity, 65_536);
///
/// let config = SystemConfig::builder()
///     .worker_threads(4)
///     .mailbox_capacity(1024)
///     .build()
///     .unwrap();
/// assert_eq!(config.mailbox_capacity, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Number of scheduler worker threads. `0` means auto-detect (CPU
    /// count, minimum 1) at [`super::ActorSystem::start`] time.
    pub worker_threads: usize,
    /// Capacity of each worker's local run-queue. Must be a power of two.
    pub worker_queue_capacity: u32,
    /// Capacity of the scheduler's global overflow queue. Must be a power
    /// of two.
    pub global_queue_capacity: u32,
    /// Default per-actor mailbox capacity. Must be a power of two.
    pub mailbox_capacity: u32,
    /// Max messages drained per actor per dispatch.
    pub batch_size: u32,
    /// Busy-wait iterations a worker spins before yielding to the OS.
    pub spin_cycles: u32,
    /// If `false`, workers only consume their local and the global queue.
    pub enable_work_stealing: bool,
    /// Restarts allowed within `restart_window` before a restart escalates.
    pub max_restarts: u32,
    /// Sliding window, in seconds, over which restarts are counted.
    #[serde(with = "crate::util::duration_serde")]
    pub restart_window: Duration,
    /// Delay before the first restart.
    #[serde(with = "crate::util::duration_serde")]
    pub backoff_initial: Duration,
    /// Upper bound on restart backoff delay.
    #[serde(with = "crate::util::duration_serde")]
    pub backoff_max: Duration,
    /// Factor the backoff delay grows by per consecutive restart.
    pub backoff_multiplier: f64,
    /// Strategy applied when a behavior raises an error and has no more
    /// specific supervisor consulted first.
    pub supervisor_strategy: SupervisorStrategy,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            worker_queue_capacity: DEFAULT_WORKER_QUEUE_CAPACITY,
            global_queue_capacity: DEFAULT_GLOBAL_QUEUE_CAPACITY,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            spin_cycles: DEFAULT_SPIN_CYCLES,
            enable_work_stealing: true,
            max_restarts: DEFAULT_MAX_RESTARTS,
            restart_window: DEFAULT_RESTART_WINDOW,
            backoff_initial: DEFAULT_BACKOFF_INITIAL,
            backoff_max: DEFAULT_BACKOFF_MAX,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            supervisor_strategy: SupervisorStrategy::Restart,
        }
    }
}

impl SystemConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> SystemConfigBuilder {
        SystemConfigBuilder::default()
    }

    /// Resolved worker thread count: `worker_threads` if non-zero, else the
    /// detected CPU count (minimum 1).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.worker_threads
        }
    }

    /// Validate every field. All queue/mailbox capacities must be non-zero
    /// powers of two; `max_restarts` must be non-zero; `backoff_multiplier`
    /// must be finite and `>= 1.0`.
    pub fn validate(&self) -> Result<(), SystemError> {
        for (name, value) in [
            ("worker_queue_capacity", self.worker_queue_capacity),
            ("global_queue_capacity", self.global_queue_capacity),
            ("mailbox_capacity", self.mailbox_capacity),
        ] {
            if value == 0 || !value.is_power_of_two() {
                return Err(SystemError::InvalidConfig(format!(
                    "{name} must be a non-zero power of two, got {value}"
                )));
            }
        }
        if self.batch_size == 0 {
            return Err(SystemError::InvalidConfig(
                "batch_size must be non-zero".to_string(),
            ));
        }
        if self.max_restarts == 0 {
            return Err(SystemError::InvalidConfig(
                "max_restarts must be non-zero".to_string(),
            ));
        }
        if self.restart_window.is_zero() {
            return Err(SystemError::InvalidConfig(
                "restart_window must be non-zero".to_string(),
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(SystemError::InvalidConfig(
                "backoff_multiplier must be finite and >= 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for [`SystemConfig`].
#[derive(Debug, Clone, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

macro_rules! builder_field {
    ($name:ident, $field:ident, $ty:ty) => {
        #[doc = concat!("Set `", stringify!($field), "`.")]
        pub fn $name(mut self, value: $ty) -> Self {
            self.config.$field = value;
            self
        }
    };
}

impl SystemConfigBuilder {
    builder_field!(worker_threads, worker_threads, usize);
    builder_field!(worker_queue_capacity, worker_queue_capacity, u32);
    builder_field!(global_queue_capacity, global_queue_capacity, u32);
    builder_field!(mailbox_capacity, mailbox_capacity, u32);
    builder_field!(batch_size, batch_size, u32);
    builder_field!(spin_cycles, spin_cycles, u32);
    builder_field!(enable_work_stealing, enable_work_stealing, bool);
    builder_field!(max_restarts, max_restarts, u32);
    builder_field!(restart_window, restart_window, Duration);
    builder_field!(backoff_initial, backoff_initial, Duration);
    builder_field!(backoff_max, backoff_max, Duration);
    builder_field!(backoff_multiplier, backoff_multiplier, f64);
    builder_field!(supervisor_strategy, supervisor_strategy, SupervisorStrategy);

    /// Validate and produce the final [`SystemConfig`].
    pub fn build(self) -> Result<SystemConfig, SystemError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
