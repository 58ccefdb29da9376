//! A single scheduler worker thread: local run-queue, stealing, park/unpark.

// Layer 1: Standard library imports
use std::cell::{Cell, UnsafeCell};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use rand::Rng;

// Layer 3: Internal module imports
use crate::actor::ActorCell;
use crate::ring::{self, Consumer, Producer};
use crate::scheduler::task::DrainTask;
use crate::scheduler::Scheduler;

thread_local! {
    /// Set for the lifetime of a worker thread; lets [`super::Scheduler::submit`]
    /// tell a worker submitting its own re-arm task from an arbitrary
    /// application thread.
    pub(crate) static CURRENT_WORKER: Cell<Option<usize>> = const { Cell::new(None) };
}

/// One worker's local run-queue plus its bookkeeping.
///
/// The local queue is an SPSC ring whose sole producer is the owning
/// worker thread (pushes never contend) and whose consumer side is shared
/// between the owner (the common case) and occasional thieves. Consumer
/// access is therefore behind a `Mutex`, used as a try-lock: the owner
/// attempts a non-blocking pop and simply tries again next loop iteration
/// rather than contend with a thief holding it.
pub(crate) struct WorkerHandle {
    pub(crate) id: usize,
    local_producer: UnsafeCell<Producer<DrainTask>>,
    local_consumer: Mutex<Consumer<DrainTask>>,
    tasks_processed: AtomicU64,
}

// SAFETY: `local_producer` is only ever dereferenced by the worker thread
// that owns this handle (enforced by `Scheduler::submit` checking
// `CURRENT_WORKER` before taking the unsafe path); `local_consumer` is
// already `Sync` via its `Mutex`.
unsafe impl Sync for WorkerHandle {}

impl WorkerHandle {
    pub(crate) fn new(id: usize, capacity: u32) -> Result<Self, ring::RingError> {
        let (producer, consumer) = ring::channel(capacity)?;
        Ok(Self {
            id,
            local_producer: UnsafeCell::new(producer),
            local_consumer: Mutex::new(consumer),
            tasks_processed: AtomicU64::new(0),
        })
    }

    /// Push onto this worker's local queue. Must only be called from the
    /// thread that owns this handle.
    ///
    /// # Safety
    /// Caller must be running on the worker thread identified by `self.id`.
    pub(crate) unsafe fn push_local(&self, task: DrainTask) -> Result<(), DrainTask> {
        (*self.local_producer.get()).push(task)
    }

    pub(crate) fn try_pop_local(&self) -> Option<DrainTask> {
        self.local_consumer.try_lock().and_then(|mut c| c.pop())
    }

    /// Attempt to steal one task from this (another worker's) queue.
    pub(crate) fn try_steal(&self) -> Option<DrainTask> {
        self.local_consumer.try_lock().and_then(|mut c| c.pop())
    }

    pub(crate) fn record_processed(&self) {
        self.tasks_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn tasks_processed(&self) -> u64 {
        self.tasks_processed.load(Ordering::Relaxed)
    }
}

/// Pick a random worker index distinct from `exclude`, for `n > 1`.
pub(crate) fn random_victim(n: usize, exclude: usize) -> Option<usize> {
    if n <= 1 {
        return None;
    }
    let mut victim = rand::thread_rng().gen_range(0..n - 1);
    if victim >= exclude {
        victim += 1;
    }
    Some(victim)
}

/// The body of one worker thread: local queue → global queue → steal →
/// spin/yield/park, until the scheduler is halted.
pub(crate) fn run(scheduler: Arc<Scheduler>, id: usize) {
    CURRENT_WORKER.with(|c| c.set(Some(id)));
    let handle = Arc::clone(&scheduler.workers[id]);
    let mut spins: u32 = 0;

    while scheduler.is_accepting() {
        let task = handle
            .try_pop_local()
            .or_else(|| scheduler.global.pop())
            .or_else(|| {
                if scheduler.config.enable_work_stealing {
                    random_victim(scheduler.workers.len(), id)
                        .and_then(|victim| scheduler.workers[victim].try_steal())
                } else {
                    None
                }
            });

        match task {
            Some(task) => {
                handle.record_processed();
                // A task published with `token == true` but whose actor is
                // no longer pending was already drained (and re-armed, or
                // found nothing to re-arm) by the time this worker got to
                // it; running `drain` again would be redundant at best.
                if task.token && !task.actor.is_pending() {
                    spins = 0;
                    continue;
                }
                task.actor.drain(scheduler.config.batch_size);
                spins = 0;
            }
            None => {
                spins += 1;
                if spins < scheduler.config.spin_cycles {
                    std::hint::spin_loop();
                } else if spins < scheduler.config.spin_cycles.saturating_mul(2) {
                    std::thread::yield_now();
                } else {
                    scheduler.park(Duration::from_millis(5));
                    spins = 0;
                }
            }
        }
    }
}
