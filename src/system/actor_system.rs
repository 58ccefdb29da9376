//! The top-level coordinator: creates/destroys actors, owns the scheduler,
//! and drives system-wide shutdown.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tracing::info;

// Layer 3: Internal module imports
use crate::actor::{ActorCell, ActorCore, ActorState, Behavior};
use crate::mailbox::EnqueueOutcome;
use crate::message::{ControlSignal, Message};
use crate::scheduler::{DrainTask, Scheduler, SchedulerConfig};
use crate::supervisor::{DefaultSupervisor, RestartBackoff, Supervisor};
use crate::system::config::SystemConfig;
use crate::system::errors::SystemError;
use crate::system::handle::SystemHandle;
use crate::util::ActorId;

/// The id external, non-actor callers send from. Distinguishable from any
/// spawned actor, whose sequence numbers start at 1 (see
/// [`crate::util::ActorId::next`]).
const EXTERNAL_SENDER: ActorId = ActorId::from_parts(0, 0, 0);

/// Per-spawn overrides layered on top of [`SystemConfig`]'s defaults.
pub struct SpawnOptions<B: Behavior> {
    /// Human-readable name, currently used only for `tracing` fields —
    /// the registry keys on [`ActorId`], not name.
    pub name: Option<String>,
    /// The actor this one is spawned under, for escalation and for
    /// children-before-parents shutdown ordering.
    pub parent: Option<ActorId>,
    /// Overrides `SystemConfig::mailbox_capacity` for this actor only.
    pub mailbox_capacity: Option<u32>,
    /// Rebuilds `behavior` on a supervisor-ordered restart. Without one,
    /// `Restart` directives degrade to `Stop`.
    pub behavior_factory: Option<Box<dyn Fn() -> B + Send + Sync>>,
    /// Whether a restart preserves in-flight mailbox contents. Defaults to
    /// `true` per the crate's resolved "preserve mailbox" open question.
    pub preserve_mailbox_on_restart: bool,
    /// Overrides the system's default supervisor for this actor only.
    pub supervisor: Option<Arc<dyn Supervisor>>,
}

impl<B: Behavior> Default for SpawnOptions<B> {
    fn default() -> Self {
        Self {
            name: None,
            parent: None,
            mailbox_capacity: None,
            behavior_factory: None,
            preserve_mailbox_on_restart: true,
            supervisor: None,
        }
    }
}

/// A handle to a spawned actor.
///
/// Carries the actor's id and a *weak* reference: the registry and
/// in-flight drain tasks are what keep an actor alive, not a caller holding
/// an `ActorRef`. Every operation upgrades the weak reference and reports
/// [`crate::actor::ActorError::ActorNotRunning`] if the actor has already
/// been fully reclaimed.
#[derive(Clone)]
pub struct ActorRef {
    id: ActorId,
    actor: std::sync::Weak<dyn ActorCell>,
    system: std::sync::Weak<SystemHandle>,
}

impl ActorRef {
    /// This actor's id.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Send a message. `Ok(Delivered)`/`Ok(Full)` mirror the ring's
    /// back-pressure contract; `Err(ActorNotRunning)` covers both "already
    /// reclaimed" and "stopping/stopped/failed."
    pub fn send(&self, msg: Message) -> Result<EnqueueOutcome, crate::actor::ActorError> {
        let actor = self
            .actor
            .upgrade()
            .ok_or(crate::actor::ActorError::ActorNotRunning)?;
        let outcome = actor.send(msg)?;
        if let EnqueueOutcome::Delivered {
            should_schedule: true,
        } = outcome
        {
            if let Some(system) = self.system.upgrade() {
                system.submit_drain(DrainTask::new(actor))?;
            }
        }
        Ok(outcome)
    }

    /// Send a well-known system-kind message (currently only
    /// [`ControlSignal::Stop`], which is equivalent to calling
    /// [`ActorRef::stop`]).
    pub fn send_system(
        &self,
        signal: ControlSignal,
    ) -> Result<EnqueueOutcome, crate::actor::ActorError> {
        self.send(Message::control(EXTERNAL_SENDER, self.id, signal))
    }

    /// Request a graceful stop. Idempotent.
    pub fn stop(&self) -> Result<(), crate::actor::ActorError> {
        let actor = self
            .actor
            .upgrade()
            .ok_or(crate::actor::ActorError::ActorNotRunning)?;
        actor.stop()
    }

    /// Current lifecycle state, or `None` if the actor has already been
    /// fully reclaimed.
    pub fn state(&self) -> Option<ActorState> {
        self.actor.upgrade().map(|a| a.state())
    }

    /// A snapshot of this actor's lifetime counters, or `None` if already
    /// reclaimed.
    pub fn metrics(&self) -> Option<crate::actor::ActorMetricsSnapshot> {
        self.actor.upgrade().map(|a| a.metrics())
    }
}

/// The top-level coordinator.
///
/// Owns the scheduler and the actor registry (via [`SystemHandle`]) and a
/// copy of the validated [`SystemConfig`] it was initialized with. Cheap to
/// clone: internally an `Arc`.
#[derive(Clone)]
pub struct ActorSystem {
    config: SystemConfig,
    handle: Arc<SystemHandle>,
    started: Arc<AtomicBool>,
    shutting_down: Arc<AtomicBool>,
}

impl ActorSystem {
    /// Validate `config` and construct a system. Does not spawn worker
    /// threads yet — call [`ActorSystem::start`] for that.
    pub fn init(config: SystemConfig) -> Result<Self, SystemError> {
        config.validate()?;
        let scheduler_config = SchedulerConfig {
            worker_threads: config.resolved_worker_threads(),
            worker_queue_capacity: config.worker_queue_capacity,
            global_queue_capacity: config.global_queue_capacity,
            batch_size: config.batch_size,
            spin_cycles: config.spin_cycles,
            enable_work_stealing: config.enable_work_stealing,
        };
        let scheduler = Scheduler::new(scheduler_config)
            .map_err(|err| SystemError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            config,
            handle: SystemHandle::new(scheduler),
            started: Arc::new(AtomicBool::new(false)),
            shutting_down: Arc::new(AtomicBool::new(false)),
        })
    }

    /// This system's configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Number of actors currently registered.
    pub fn actor_count(&self) -> usize {
        self.handle.actor_count()
    }

    /// `true` once [`ActorSystem::shutdown`] has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Spawn the scheduler's worker threads. Idempotent: calling twice is a
    /// no-op.
    pub fn start(&self) -> Result<(), SystemError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.handle.scheduler.start();
        info!(workers = self.handle.scheduler.worker_count(), "actor system started");
        Ok(())
    }

    /// Spawn a new actor running `behavior`.
    ///
    /// Allocates an id, constructs the actor, registers it, and runs its
    /// `pre_start` hook. On success, returns an [`ActorRef`]. On failure
    /// (an illegal state transition, most likely because `pre_start`
    /// returned an error), the actor is unregistered and never scheduled.
    pub fn spawn<B: Behavior>(
        &self,
        behavior: B,
        opts: SpawnOptions<B>,
    ) -> Result<ActorRef, SystemError> {
        if self.is_shutting_down() {
            return Err(SystemError::ShuttingDown);
        }
        let id = ActorId::next(0);
        let supervisor: Arc<dyn Supervisor> = opts
            .supervisor
            .unwrap_or_else(|| Arc::new(DefaultSupervisor::new(self.config.supervisor_strategy)));
        let restart_backoff = RestartBackoff::new(
            self.config.max_restarts,
            self.config.restart_window,
            self.config.backoff_initial,
            self.config.backoff_max,
            self.config.backoff_multiplier,
        );
        let mailbox_capacity = opts.mailbox_capacity.unwrap_or(self.config.mailbox_capacity);

        let core = ActorCore::new(
            id,
            opts.parent,
            behavior,
            opts.behavior_factory,
            mailbox_capacity,
            opts.preserve_mailbox_on_restart,
            supervisor,
            restart_backoff,
            Arc::downgrade(&self.handle),
        )
        .map_err(|err| SystemError::InvalidConfig(err.to_string()))?;

        // Register before `start()` runs `pre_start`, so a self-send during
        // `pre_start` resolves against `SystemHandle::lookup`.
        let cell: Arc<dyn ActorCell> = core.clone();
        self.handle.insert(Arc::clone(&cell));

        if let Err(err) = core.start() {
            self.handle.remove(id);
            return Err(SystemError::Actor(err));
        }

        info!(actor = %id, name = opts.name.as_deref().unwrap_or(""), "actor spawned");
        Ok(ActorRef {
            id,
            actor: Arc::downgrade(&cell),
            system: Arc::downgrade(&self.handle),
        })
    }

    /// Stop the actor registered under `id`. Stopping an already-stopping
    /// or already-stopped actor is idempotent, but `id` must name a
    /// currently-registered actor: returns
    /// `Err(SystemError::ActorNotFound(id))` if it does not.
    pub fn stop(&self, id: ActorId) -> Result<(), SystemError> {
        match self.handle.lookup(id) {
            Some(actor) => {
                actor.stop().map_err(SystemError::Actor)?;
                Ok(())
            }
            None => Err(SystemError::ActorNotFound(id)),
        }
    }

    /// Gracefully shut the system down: stop every actor (children before
    /// parents), wait for them to quiesce, then halt the scheduler.
    ///
    /// Returns once every worker thread has joined.
    pub fn shutdown(&self) -> Result<(), SystemError> {
        if self.shutting_down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let order = self.handle.shutdown_order();
        for id in &order {
            if let Some(actor) = self.handle.lookup(*id) {
                let _ = actor.stop();
            }
        }
        self.wait_for_quiescence(order.len());
        self.handle.scheduler.begin_stopping();
        self.handle.scheduler.halt();
        info!("actor system shut down");
        Ok(())
    }

    fn wait_for_quiescence(&self, _expected: usize) {
        use std::time::{Duration, Instant};
        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            let all_stopped = self
                .handle
                .all()
                .iter()
                .all(|a| matches!(a.state(), ActorState::Stopped | ActorState::Failed));
            if all_stopped || Instant::now() > deadline {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
