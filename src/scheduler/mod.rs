//! Worker threads, per-worker run-queues, the global overflow queue, and
//! the work-stealing dispatch loop that drives actor drain tasks.
//!
//! ## Resolved open question: stealing from an SPSC queue
//!
//! Per-worker run-queues stay a plain [`crate::ring`] SPSC ring rather than
//! a Chase–Lev deque: the owner's consumer side is wrapped in a
//! `parking_lot::Mutex` used purely as a try-lock (the owner never blocks
//! on it, a thief either gets the lock or moves to the next victim). This
//! trades a small amount of steal throughput for reusing the same ring
//! implementation everywhere in the crate; see `DESIGN.md`.

pub mod task;
pub mod worker;

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

// Layer 2: Third-party crate imports
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

// Layer 3: Internal module imports
use crate::ring::{self, RingError};

pub use task::{DrainTask, SchedulerError};
pub(crate) use worker::CURRENT_WORKER;

/// The subset of [`crate::system::SystemConfig`] the scheduler needs.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub worker_threads: usize,
    pub worker_queue_capacity: u32,
    pub global_queue_capacity: u32,
    pub batch_size: u32,
    pub spin_cycles: u32,
    pub enable_work_stealing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum SchedulerState {
    Stopped = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl SchedulerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Stopped,
            1 => Self::Starting,
            2 => Self::Running,
            _ => Self::Stopping,
        }
    }
}

/// A bounded, lock-guarded MPMC queue: many actor-hosting threads publish
/// to it, every worker may pop from it. Built from the same SPSC ring as
/// everything else in the crate, with both ends behind a `Mutex` since
/// both sides now have multiple callers (§5: "a standard lock-free bounded
/// MPMC structure or a lock+ring may implement it").
struct GlobalQueue {
    producer: Mutex<ring::Producer<DrainTask>>,
    consumer: Mutex<ring::Consumer<DrainTask>>,
}

impl GlobalQueue {
    fn new(capacity: u32) -> Result<Self, RingError> {
        let (producer, consumer) = ring::channel(capacity)?;
        Ok(Self {
            producer: Mutex::new(producer),
            consumer: Mutex::new(consumer),
        })
    }

    fn push(&self, task: DrainTask) -> Result<(), DrainTask> {
        self.producer.lock().push(task)
    }

    fn pop(&self) -> Option<DrainTask> {
        self.consumer.lock().pop()
    }
}

/// Owns every worker thread, the global overflow queue, and the park/unpark
/// protocol that keeps idle workers from burning CPU.
pub struct Scheduler {
    workers: Vec<Arc<WorkerHandle>>,
    global: GlobalQueue,
    config: SchedulerConfig,
    state: AtomicU8,
    park_lock: Mutex<()>,
    park_cv: Condvar,
    join_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Construct a scheduler with `config.worker_threads` workers, each with
    /// a local run-queue of `config.worker_queue_capacity`, and a global
    /// queue of `config.global_queue_capacity`. Does not spawn threads yet —
    /// call [`Scheduler::start`] for that.
    pub fn new(config: SchedulerConfig) -> Result<Arc<Self>, RingError> {
        let worker_threads = config.worker_threads.max(1);
        let mut workers = Vec::with_capacity(worker_threads);
        for id in 0..worker_threads {
            workers.push(Arc::new(WorkerHandle::new(id, config.worker_queue_capacity)?));
        }
        Ok(Arc::new(Self {
            workers,
            global: GlobalQueue::new(config.global_queue_capacity)?,
            config,
            state: AtomicU8::new(SchedulerState::Stopped as u8),
            park_lock: Mutex::new(()),
            park_cv: Condvar::new(),
            join_handles: Mutex::new(Vec::new()),
        }))
    }

    /// Number of workers this scheduler owns.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Lifetime drain-task count processed by each worker, indexed by
    /// worker id — used by the work-stealing load-balance scenario test.
    pub fn tasks_processed_per_worker(&self) -> Vec<u64> {
        self.workers.iter().map(|w| w.tasks_processed()).collect()
    }

    fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// `true` once workers are dispatching tasks and not yet past
    /// `Stopping`.
    pub fn is_accepting(&self) -> bool {
        !matches!(self.state(), SchedulerState::Stopped)
    }

    /// Spawn the worker threads and transition to `Running`.
    pub fn start(self: &Arc<Self>) {
        self.state.store(SchedulerState::Starting as u8, Ordering::Release);
        let mut handles = self.join_handles.lock();
        for id in 0..self.workers.len() {
            let scheduler = Arc::clone(self);
            handles.push(thread::spawn(move || worker::run(scheduler, id)));
        }
        self.state.store(SchedulerState::Running as u8, Ordering::Release);
        debug!(workers = self.workers.len(), "scheduler started");
    }

    /// Enter `Stopping`: workers keep running and keep draining tasks for
    /// actors still `Running`/`Stopping`, but tasks for already-`Stopped`
    /// actors are dropped (handled by [`crate::actor::ActorCore::drain`]
    /// itself, which no-ops outside those two states). Call [`Scheduler::halt`]
    /// once the caller has confirmed every actor has quiesced.
    pub fn begin_stopping(&self) {
        self.state.store(SchedulerState::Stopping as u8, Ordering::Release);
        self.park_cv.notify_all();
    }

    /// Halt workers and join their threads. Must only be called after
    /// [`Scheduler::begin_stopping`].
    pub fn halt(&self) {
        self.state.store(SchedulerState::Stopped as u8, Ordering::Release);
        self.park_cv.notify_all();
        let mut handles = self.join_handles.lock();
        for handle in handles.drain(..) {
            // A panicking worker thread is a bug elsewhere in the runtime;
            // there is nothing more to do here than let it surface.
            let _ = handle.join();
        }
        debug!("scheduler halted");
    }

    /// Publish a drain task. Callable from any thread. If the calling
    /// thread is one of this scheduler's workers, the task goes to that
    /// worker's own local queue (never contended, since a worker is the
    /// sole producer of its own queue); otherwise — or if the local queue
    /// is full — it goes to the global queue.
    pub fn submit(&self, task: DrainTask) -> Result<(), SchedulerError> {
        if let Some(id) = CURRENT_WORKER.with(|c| c.get()) {
            if id < self.workers.len() {
                // SAFETY: `CURRENT_WORKER` is set only inside this
                // scheduler's own worker loop (see `worker::run`), to the
                // index of the thread running it, so the calling thread is
                // the sole permitted producer for `self.workers[id]`.
                match unsafe { self.workers[id].push_local(task) } {
                    Ok(()) => {
                        self.wake_one();
                        return Ok(());
                    }
                    Err(task) => return self.submit_global(task),
                }
            }
        }
        self.submit_global(task)
    }

    fn submit_global(&self, task: DrainTask) -> Result<(), SchedulerError> {
        match self.global.push(task) {
            Ok(()) => {
                self.wake_one();
                Ok(())
            }
            Err(_) => {
                warn!("worker-local and global run queues both full");
                Err(SchedulerError::Overflow)
            }
        }
    }

    fn wake_one(&self) {
        self.park_cv.notify_one();
    }

    fn park(&self, timeout: Duration) {
        let mut guard = self.park_lock.lock();
        self.park_cv.wait_for(&mut guard, timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorCell;
    use crate::util::ActorId;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn config() -> SchedulerConfig {
        SchedulerConfig {
            worker_threads: 2,
            worker_queue_capacity: 8,
            global_queue_capacity: 8,
            batch_size: 16,
            spin_cycles: 10,
            enable_work_stealing: true,
        }
    }

    struct CountingCell {
        id: ActorId,
        count: Arc<AtomicUsize>,
    }

    impl ActorCell for CountingCell {
        fn id(&self) -> ActorId {
            self.id
        }

        fn parent(&self) -> Option<ActorId> {
            None
        }

        fn state(&self) -> crate::actor::ActorState {
            crate::actor::ActorState::Running
        }

        fn send(
            &self,
            _msg: crate::message::Message,
        ) -> Result<crate::mailbox::EnqueueOutcome, crate::actor::ActorError> {
            unimplemented!("not exercised by these tests")
        }

        fn stop(&self) -> Result<(), crate::actor::ActorError> {
            Ok(())
        }

        fn drain(&self, _batch_budget: u32) -> u32 {
            self.count.fetch_add(1, Ordering::SeqCst);
            1
        }

        fn escalate(
            &self,
            _child: ActorId,
            _error: &(dyn std::error::Error + Send + Sync + 'static),
        ) -> crate::supervisor::SupervisorStrategy {
            crate::supervisor::SupervisorStrategy::Stop
        }

        fn metrics(&self) -> crate::actor::ActorMetricsSnapshot {
            Default::default()
        }

        fn is_pending(&self) -> bool {
            false
        }
    }

    #[test]
    fn submitted_task_is_executed_by_a_worker() {
        let scheduler = Scheduler::new(config()).expect("valid config");
        scheduler.start();
        let count = Arc::new(AtomicUsize::new(0));
        let cell: Arc<dyn ActorCell> = Arc::new(CountingCell {
            id: ActorId::next(0),
            count: Arc::clone(&count),
        });
        scheduler.submit(DrainTask::new(cell)).expect("room");

        let mut waited = Duration::ZERO;
        while count.load(Ordering::SeqCst) == 0 && waited < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(5));
            waited += Duration::from_millis(5);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);

        scheduler.begin_stopping();
        scheduler.halt();
    }

    #[test]
    fn overflow_is_reported_once_both_queues_are_full() {
        let cfg = SchedulerConfig {
            worker_threads: 1,
            worker_queue_capacity: 2,
            global_queue_capacity: 2,
            ..config()
        };
        let scheduler = Scheduler::new(cfg).expect("valid config");
        // Never started: nothing drains the global queue, so it fills.
        let count = Arc::new(AtomicUsize::new(0));
        let mut overflowed = false;
        for _ in 0..8 {
            let cell: Arc<dyn ActorCell> = Arc::new(CountingCell {
                id: ActorId::next(0),
                count: Arc::clone(&count),
            });
            if scheduler.submit(DrainTask::new(cell)).is_err() {
                overflowed = true;
                break;
            }
        }
        assert!(overflowed);
    }
}
