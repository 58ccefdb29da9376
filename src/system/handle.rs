//! The cheap handle every actor holds back to its owning system.
//!
//! `SystemHandle` is what [`crate::actor::ActorContext`] and
//! [`crate::actor::core::ActorCore`] use to reach the registry and the
//! scheduler without holding a reference to the full [`super::ActorSystem`].
//! It is the one piece of shared state an actor's drain procedure may touch
//! outside its own mailbox and behavior value.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;

// Layer 3: Internal module imports
use crate::actor::{ActorCell, ActorError};
use crate::mailbox::EnqueueOutcome;
use crate::message::Message;
use crate::scheduler::{DrainTask, Scheduler, SchedulerError};
use crate::util::ActorId;

/// The `{ActorId -> Arc<dyn ActorCell>}` registry plus the scheduler, shared
/// by every actor spawned under one [`super::ActorSystem`].
///
/// Guarded by a reader-writer lock per the crate's shared-resource policy:
/// insert/remove take the writer, `lookup` takes the reader.
pub struct SystemHandle {
    pub(crate) scheduler: Arc<Scheduler>,
    registry: RwLock<HashMap<ActorId, Arc<dyn ActorCell>>>,
    /// parent -> children, maintained alongside `registry` to back
    /// children-before-parents shutdown ordering (§4.6.1).
    children: RwLock<HashMap<ActorId, Vec<ActorId>>>,
}

impl SystemHandle {
    pub(crate) fn new(scheduler: Arc<Scheduler>) -> Arc<Self> {
        Arc::new(Self {
            scheduler,
            registry: RwLock::new(HashMap::new()),
            children: RwLock::new(HashMap::new()),
        })
    }

    pub(crate) fn insert(&self, actor: Arc<dyn ActorCell>) {
        if let Some(parent) = actor.parent() {
            self.children.write().entry(parent).or_default().push(actor.id());
        }
        self.registry.write().insert(actor.id(), actor);
    }

    pub(crate) fn remove(&self, id: ActorId) -> Option<Arc<dyn ActorCell>> {
        let removed = self.registry.write().remove(&id);
        if let Some(actor) = &removed {
            if let Some(parent) = actor.parent() {
                if let Some(siblings) = self.children.write().get_mut(&parent) {
                    siblings.retain(|c| *c != id);
                }
            }
        }
        self.children.write().remove(&id);
        removed
    }

    /// Ids of every actor spawned with `parent` as their parent.
    pub(crate) fn children_of(&self, parent: ActorId) -> Vec<ActorId> {
        self.children.read().get(&parent).cloned().unwrap_or_default()
    }

    /// All registered ids, ordered so that every actor appears after all of
    /// its descendants (children-before-parents, per [`super::ActorSystem::shutdown`]).
    pub(crate) fn shutdown_order(&self) -> Vec<ActorId> {
        let all: Vec<ActorId> = self.registry.read().keys().copied().collect();
        let roots: Vec<ActorId> = {
            let registry = self.registry.read();
            all.iter()
                .copied()
                .filter(|id| registry.get(id).and_then(|a| a.parent()).is_none())
                .collect()
        };
        let mut order = Vec::with_capacity(all.len());
        let mut visited = std::collections::HashSet::new();
        fn visit(
            handle: &SystemHandle,
            id: ActorId,
            order: &mut Vec<ActorId>,
            visited: &mut std::collections::HashSet<ActorId>,
        ) {
            if !visited.insert(id) {
                return;
            }
            for child in handle.children_of(id) {
                visit(handle, child, order, visited);
            }
            order.push(id);
        }
        for root in roots {
            visit(self, root, &mut order, &mut visited);
        }
        // Any actor unreachable from a root (shouldn't happen, but guards
        // against a registry/children map inconsistency) is appended last.
        for id in all {
            if !visited.contains(&id) {
                order.push(id);
            }
        }
        order
    }

    /// Look up an actor by id. Used by [`crate::actor::ActorContext::send`]
    /// to resolve a peer and by a child escalating to its parent.
    pub fn lookup(&self, id: ActorId) -> Option<Arc<dyn ActorCell>> {
        self.registry.read().get(&id).cloned()
    }

    /// Every actor currently registered, in no particular order.
    pub(crate) fn all(&self) -> Vec<Arc<dyn ActorCell>> {
        self.registry.read().values().cloned().collect()
    }

    /// Number of actors currently registered.
    pub fn actor_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Send `msg` (whose `receiver` field names the target) to the actor
    /// registered under that id.
    pub fn send(&self, receiver: ActorId, msg: Message) -> Result<(), ActorError> {
        let actor = self
            .lookup(receiver)
            .ok_or(ActorError::ActorNotRunning)?;
        match actor.send(msg)? {
            EnqueueOutcome::Delivered { should_schedule } => {
                if should_schedule {
                    self.submit_drain(DrainTask::new(actor))?;
                }
                Ok(())
            }
            EnqueueOutcome::Full => Err(ActorError::MailboxFull),
        }
    }

    /// Request that `receiver` stop. A no-op if unknown.
    pub fn stop(&self, receiver: ActorId) {
        if let Some(actor) = self.lookup(receiver) {
            let _ = actor.stop();
        }
    }

    /// Publish a drain task to the scheduler, retrying with a short
    /// spin-sleep on overflow per §4.5: dropping the task would violate
    /// **I-PENDING**, so the caller backs off instead of giving up.
    pub(crate) fn submit_drain(&self, task: DrainTask) -> Result<(), SchedulerError> {
        let mut task = task;
        let mut backoff = std::time::Duration::from_micros(50);
        for _ in 0..8 {
            match self.scheduler.submit(task.clone()) {
                Ok(()) => return Ok(()),
                Err(SchedulerError::Overflow) => {
                    std::thread::sleep(backoff);
                    backoff = (backoff * 2).min(std::time::Duration::from_millis(10));
                }
            }
        }
        self.scheduler.submit(task)
    }
}
