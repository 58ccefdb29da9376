//! The concrete actor: state machine, mailbox, user behavior, and the
//! drain procedure that ties them together.

// Layer 1: Standard library imports
use std::sync::{Arc, Weak};
use std::time::Duration;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tracing::{error, info, warn};

// Layer 3: Internal module imports
use crate::actor::behavior::Behavior;
use crate::actor::context::ActorContext;
use crate::actor::error::ActorError;
use crate::actor::lifecycle::ActorStateCell;
use crate::actor::metrics::{ActorMetrics, ActorMetricsSnapshot};
use crate::actor::ActorState;
use crate::mailbox::{EnqueueOutcome, Mailbox, MailboxError};
use crate::message::{ControlSignal, Message, MessageKind};
use crate::scheduler::DrainTask;
use crate::supervisor::{RestartBackoff, Supervisor, SupervisorStrategy};
use crate::system::handle::SystemHandle;
use crate::util::ActorId;

/// The object-safe face every actor presents to the scheduler and the
/// registry, regardless of its concrete [`Behavior`] type.
///
/// `Arc<dyn ActorCell>` is what the registry stores and what a
/// [`crate::scheduler::DrainTask`] carries; this is the "reference-counted
/// drain-task payload" pattern from the design notes, expressed with
/// ownership rather than a manual atomic refcount.
pub trait ActorCell: Send + Sync {
    /// This actor's id.
    fn id(&self) -> ActorId;

    /// The id this actor was spawned under, if any — used for
    /// children-before-parents shutdown ordering and for escalation.
    fn parent(&self) -> Option<ActorId>;

    /// Current lifecycle state.
    fn state(&self) -> ActorState;

    /// Enqueue a message from an arbitrary sender thread. Rejects with
    /// [`ActorError::ActorNotRunning`] if this actor is `Stopping`,
    /// `Stopped` or `Failed`; messages sent while `Created`/`Starting`/
    /// `Restarting` are accepted and wait in the mailbox.
    fn send(&self, msg: Message) -> Result<EnqueueOutcome, ActorError>;

    /// Request a graceful stop. Idempotent: stopping an already-stopped
    /// actor succeeds with no effect.
    fn stop(&self) -> Result<(), ActorError>;

    /// Process up to `batch_budget` messages. Called only by a scheduler
    /// worker; no-ops (returns 0) for any state other than `Running` or
    /// `Stopping`.
    fn drain(&self, batch_budget: u32) -> u32;

    /// Consulted by a child actor escalating an error: decides how the
    /// child (identified by `child`) should respond, using this actor's
    /// own supervisor.
    fn escalate(
        &self,
        child: ActorId,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    ) -> SupervisorStrategy;

    /// A snapshot of this actor's lifetime counters.
    fn metrics(&self) -> ActorMetricsSnapshot;

    /// `true` if a drain task for this actor is currently scheduled or
    /// executing. Used by a worker to recognize a [`DrainTask`] made stale
    /// by a concurrent drain that already re-armed (or found nothing to
    /// re-arm).
    fn is_pending(&self) -> bool;
}

/// The concrete actor: owns its id, lifecycle state, mailbox, behavior
/// value, and the bookkeeping needed to restart it in place.
pub struct ActorCore<B: Behavior> {
    id: ActorId,
    parent: Option<ActorId>,
    state: ActorStateCell,
    mailbox: Mailbox,
    behavior: Mutex<B>,
    behavior_factory: Option<Box<dyn Fn() -> B + Send + Sync>>,
    preserve_mailbox_on_restart: bool,
    supervisor: Arc<dyn Supervisor>,
    restart_backoff: Mutex<RestartBackoff>,
    metrics: ActorMetrics,
    system: Weak<SystemHandle>,
    self_ref: Weak<dyn ActorCell>,
}

impl<B: Behavior> ActorCore<B> {
    /// Construct a new actor, not yet started. `behavior_factory`, if
    /// provided, is used to rebuild `behavior` on a supervisor-ordered
    /// restart; without one, `Restart` directives degrade to `Stop`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ActorId,
        parent: Option<ActorId>,
        behavior: B,
        behavior_factory: Option<Box<dyn Fn() -> B + Send + Sync>>,
        mailbox_capacity: u32,
        preserve_mailbox_on_restart: bool,
        supervisor: Arc<dyn Supervisor>,
        restart_backoff: RestartBackoff,
        system: Weak<SystemHandle>,
    ) -> Result<Arc<Self>, MailboxError> {
        let mailbox = Mailbox::new(mailbox_capacity)?;
        Ok(Arc::new_cyclic(|weak: &Weak<ActorCore<B>>| {
            let self_ref: Weak<dyn ActorCell> = weak.clone();
            Self {
                id,
                parent,
                state: ActorStateCell::new(ActorState::Created),
                mailbox,
                behavior: Mutex::new(behavior),
                behavior_factory,
                preserve_mailbox_on_restart,
                supervisor,
                restart_backoff: Mutex::new(restart_backoff),
                metrics: ActorMetrics::default(),
                system,
                self_ref,
            }
        }))
    }

    /// Run `pre_start` and transition `Created -> Starting -> Running`.
    /// Called once, synchronously, by whichever thread is spawning the
    /// actor — before it is visible to the scheduler.
    pub(crate) fn start(&self) -> Result<(), ActorError> {
        self.state
            .transition(ActorState::Created, ActorState::Starting)?;
        let Some(system) = self.system.upgrade() else {
            let _ = self
                .state
                .transition(ActorState::Starting, ActorState::Failed);
            return Err(ActorError::ActorNotRunning);
        };
        let mut ctx = ActorContext::new(self.id, &system);
        match self.behavior.lock().pre_start(&mut ctx) {
            Ok(()) => {
                self.state
                    .transition(ActorState::Starting, ActorState::Running)?;
                info!(actor = %self.id, "actor started");
                Ok(())
            }
            Err(err) => {
                warn!(actor = %self.id, %err, "pre_start failed");
                let _ = self
                    .state
                    .transition(ActorState::Starting, ActorState::Failed);
                Err(ActorError::ActorNotRunning)
            }
        }
    }

    fn rearm(&self, system: &Arc<SystemHandle>) {
        if self.mailbox.mark_idle() {
            if let Some(me) = self.self_ref.upgrade() {
                if let Err(err) = system.submit_drain(DrainTask::new(me)) {
                    error!(
                        actor = %self.id,
                        ?err,
                        "could not re-arm drain task; mailbox may stall"
                    );
                }
            }
        }
    }

    fn finalize_stop(&self, system: &Arc<SystemHandle>) {
        let mut ctx = ActorContext::new(self.id, system);
        if let Err(err) = self.behavior.lock().post_stop(&mut ctx) {
            warn!(actor = %self.id, %err, "post_stop failed");
        }
        // Stopping -> Stopped is always legal; Created -> Stopping ->
        // Stopped (never started) is handled by `stop()` directly.
        let _ = self.state.transition(ActorState::Stopping, ActorState::Stopped);
        system.remove(self.id);
        info!(actor = %self.id, "actor stopped");
    }

    fn handle_behavior_error(&self, system: &Arc<SystemHandle>, error: &B::Error) {
        let erased: &(dyn std::error::Error + Send + Sync + 'static) = error;
        let directive = self.resolve_directive(self.supervisor.decide(self.id, erased), system, erased);
        match directive {
            SupervisorStrategy::Resume => {}
            SupervisorStrategy::Stop => {
                warn!(actor = %self.id, "supervisor directed stop");
                let _ = self
                    .state
                    .transition(ActorState::Running, ActorState::Stopping);
                self.finalize_stop(system);
            }
            SupervisorStrategy::Restart => self.do_restart(system, error),
            SupervisorStrategy::Escalate => {
                // resolve_directive never returns Escalate.
                unreachable!("escalation is resolved before reaching here")
            }
        }
    }

    fn resolve_directive(
        &self,
        directive: SupervisorStrategy,
        system: &Arc<SystemHandle>,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    ) -> SupervisorStrategy {
        if directive != SupervisorStrategy::Escalate {
            return directive;
        }
        if let Some(parent_id) = self.parent {
            if let Some(parent) = system.lookup(parent_id) {
                let parent_directive = parent.escalate(self.id, error);
                return if parent_directive == SupervisorStrategy::Escalate {
                    // No tree of distinct escalation policies beyond one
                    // hop: a further escalation terminates the chain.
                    SupervisorStrategy::Stop
                } else {
                    parent_directive
                };
            }
        }
        warn!(actor = %self.id, "escalate with no parent; applying root stop policy");
        SupervisorStrategy::Stop
    }

    fn do_restart(&self, system: &Arc<SystemHandle>, error: &B::Error) {
        let (exceeded, delay) = {
            let mut backoff = self.restart_backoff.lock();
            backoff.record_restart();
            (backoff.is_limit_exceeded(), backoff.calculate_delay())
        };
        if exceeded {
            warn!(actor = %self.id, "restart rate limit exceeded; escalating to stop");
            let _ = self
                .state
                .transition(ActorState::Running, ActorState::Stopping);
            self.finalize_stop(system);
            return;
        }
        let Some(factory) = self.behavior_factory.as_ref() else {
            warn!(actor = %self.id, "restart requested with no behavior factory; stopping");
            let _ = self
                .state
                .transition(ActorState::Running, ActorState::Stopping);
            self.finalize_stop(system);
            return;
        };
        if self
            .state
            .transition(ActorState::Running, ActorState::Restarting)
            .is_err()
        {
            return;
        }
        if delay > Duration::ZERO {
            std::thread::sleep(delay);
        }
        if !self.preserve_mailbox_on_restart {
            while self.mailbox.drain_one().is_some() {}
        }
        let mut ctx = ActorContext::new(self.id, system);
        {
            let mut behavior = self.behavior.lock();
            behavior.pre_restart(&mut ctx, error);
            *behavior = factory();
            if let Err(err) = behavior.post_restart(&mut ctx) {
                warn!(actor = %self.id, %err, "post_restart failed");
            }
        }
        self.metrics.record_restart();
        let _ = self
            .state
            .transition(ActorState::Restarting, ActorState::Running);
        info!(actor = %self.id, "actor restarted");
    }
}

impl<B: Behavior> ActorCell for ActorCore<B> {
    fn id(&self) -> ActorId {
        self.id
    }

    fn parent(&self) -> Option<ActorId> {
        self.parent
    }

    fn state(&self) -> ActorState {
        self.state.load()
    }

    fn send(&self, msg: Message) -> Result<EnqueueOutcome, ActorError> {
        match self.state.load() {
            ActorState::Stopping | ActorState::Stopped | ActorState::Failed => {
                return Err(ActorError::ActorNotRunning)
            }
            _ => {}
        }
        let outcome = self.mailbox.enqueue(msg);
        if let EnqueueOutcome::Delivered { .. } = outcome {
            self.metrics.record_received();
        }
        Ok(outcome)
    }

    fn stop(&self) -> Result<(), ActorError> {
        match self.state.load() {
            ActorState::Stopped | ActorState::Failed => return Ok(()), // idempotent
            ActorState::Created => {
                self.state
                    .transition(ActorState::Created, ActorState::Stopping)?;
                self.state
                    .transition(ActorState::Stopping, ActorState::Stopped)?;
                if let Some(system) = self.system.upgrade() {
                    system.remove(self.id);
                }
                return Ok(());
            }
            ActorState::Starting | ActorState::Running | ActorState::Restarting => {
                let current = self.state.load();
                self.state.transition(current, ActorState::Stopping)?;
            }
            ActorState::Stopping => {}
        }

        let stop_msg = Message::control(self.id, self.id, ControlSignal::Stop);
        match self.mailbox.enqueue(stop_msg) {
            EnqueueOutcome::Delivered { should_schedule } => {
                if should_schedule {
                    if let Some(system) = self.system.upgrade() {
                        if let Some(me) = self.self_ref.upgrade() {
                            let _ = system.submit_drain(DrainTask::new(me));
                        }
                    }
                }
            }
            EnqueueOutcome::Full => {
                warn!(actor = %self.id, "mailbox full while enqueuing stop signal; forcing stop");
                if let Some(system) = self.system.upgrade() {
                    self.finalize_stop(&system);
                }
            }
        }
        Ok(())
    }

    fn drain(&self, batch_budget: u32) -> u32 {
        let entry_state = self.state.load();
        if !matches!(entry_state, ActorState::Running | ActorState::Stopping) {
            return 0;
        }
        let Some(system) = self.system.upgrade() else {
            return 0;
        };

        let mut processed = 0u32;
        for _ in 0..batch_budget {
            let running = self.state.load() == ActorState::Running;
            let Some(msg) = self.mailbox.drain_one() else {
                break;
            };
            processed += 1;

            if msg.kind == MessageKind::Control {
                if msg.control_signal() == Some(ControlSignal::Stop) {
                    self.finalize_stop(&system);
                    break;
                }
                continue;
            }

            if !running {
                self.metrics.record_dropped_on_stop();
                continue;
            }

            let mut ctx = ActorContext::new(self.id, &system);
            let result = self.behavior.lock().receive(&mut ctx, &msg);
            self.metrics.record_processed();
            if let Err(err) = result {
                self.metrics.record_behavior_error();
                self.handle_behavior_error(&system, &err);
            }
        }

        if self.state.load() != ActorState::Stopped {
            self.rearm(&system);
        }
        processed
    }

    fn escalate(
        &self,
        child: ActorId,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    ) -> SupervisorStrategy {
        self.supervisor.decide(child, error)
    }

    fn metrics(&self) -> ActorMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn is_pending(&self) -> bool {
        self.mailbox.is_pending()
    }
}
