//! End-to-end scenarios driving a real `ActorSystem` with its scheduler
//! running on live OS threads.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use airssys_rt::prelude::*;

fn wait_until(deadline: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    loop {
        if predicate() {
            return true;
        }
        if start.elapsed() > deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
}

fn small_system() -> ActorSystem {
    let config = SystemConfig::builder()
        .worker_threads(4)
        .worker_queue_capacity(256)
        .global_queue_capacity(256)
        .mailbox_capacity(256)
        .build()
        .expect("valid config");
    let system = ActorSystem::init(config).expect("valid config");
    system.start().expect("starts");
    system
}

#[derive(Debug, thiserror::Error)]
#[error("behavior failure")]
struct Failure;

struct Echo {
    received: Arc<AtomicU64>,
}

impl Behavior for Echo {
    type Error = Failure;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), Failure> {
        self.received.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn echo_one_message() {
    let system = small_system();
    let received = Arc::new(AtomicU64::new(0));
    let actor = system
        .spawn(
            Echo {
                received: Arc::clone(&received),
            },
            SpawnOptions::default(),
        )
        .expect("spawns");

    actor
        .send(Message::user(actor.id(), actor.id()))
        .expect("delivered");

    assert!(wait_until(Duration::from_secs(2), || {
        received.load(Ordering::SeqCst) == 1
    }));

    system.shutdown().expect("shuts down");
}

struct PingPonger {
    rounds_left: AtomicU32,
    done: Arc<AtomicU64>,
}

impl Behavior for PingPonger {
    type Error = Failure;

    fn receive(&mut self, ctx: &mut ActorContext<'_>, msg: &Message) -> Result<(), Failure> {
        let remaining = self.rounds_left.fetch_sub(1, Ordering::SeqCst);
        if remaining == 0 {
            self.done.fetch_add(1, Ordering::SeqCst);
            return Ok(());
        }
        let _ = ctx.send(msg.sender, Message::user(ctx.self_id(), msg.sender));
        Ok(())
    }
}

#[test]
fn ping_pong_many_rounds() {
    let system = small_system();
    const ROUNDS: u32 = 2_000;
    let done = Arc::new(AtomicU64::new(0));

    let ping = system
        .spawn(
            PingPonger {
                rounds_left: AtomicU32::new(ROUNDS),
                done: Arc::clone(&done),
            },
            SpawnOptions::default(),
        )
        .expect("spawns ping");
    let pong = system
        .spawn(
            PingPonger {
                rounds_left: AtomicU32::new(ROUNDS),
                done: Arc::clone(&done),
            },
            SpawnOptions::default(),
        )
        .expect("spawns pong");

    // Kick off the rally: a message addressed to ping, claiming to be from
    // pong, so ping's first reply volleys back to the real pong actor.
    ping.send(Message::user(pong.id(), ping.id()))
        .expect("delivered");

    assert!(wait_until(Duration::from_secs(5), || {
        done.load(Ordering::SeqCst) >= 1
    }));

    system.shutdown().expect("shuts down");
}

struct Saturated;

impl Behavior for Saturated {
    type Error = Failure;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), Failure> {
        std::thread::sleep(Duration::from_millis(50));
        Ok(())
    }
}

#[test]
fn mailbox_full_reports_back_pressure() {
    let config = SystemConfig::builder()
        .worker_threads(1)
        .worker_queue_capacity(8)
        .global_queue_capacity(8)
        .mailbox_capacity(4)
        .build()
        .expect("valid config");
    let system = ActorSystem::init(config).expect("valid config");
    // Deliberately not started: nothing drains the mailbox, so it fills.
    let actor = system
        .spawn(Saturated, SpawnOptions::default())
        .expect("spawns");

    let mut saw_full = false;
    for _ in 0..16 {
        match actor.send(Message::user(actor.id(), actor.id())) {
            Ok(EnqueueOutcome::Full) => {
                saw_full = true;
                break;
            }
            _ => {}
        }
    }
    assert!(saw_full, "mailbox should eventually report Full under back-pressure");
}

struct Counter {
    count: Arc<AtomicU64>,
}

impl Behavior for Counter {
    type Error = Failure;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), Failure> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn work_stealing_distributes_load_across_workers() {
    let system = small_system();
    let mut totals = Vec::new();
    for _ in 0..40 {
        let count = Arc::new(AtomicU64::new(0));
        let actor = system
            .spawn(
                Counter {
                    count: Arc::clone(&count),
                },
                SpawnOptions::default(),
            )
            .expect("spawns");
        for _ in 0..10 {
            actor
                .send(Message::user(actor.id(), actor.id()))
                .expect("delivered");
        }
        totals.push(count);
    }

    assert!(wait_until(Duration::from_secs(5), || {
        totals.iter().all(|c| c.load(Ordering::SeqCst) == 10)
    }));

    system.shutdown().expect("shuts down");
}

struct AlwaysFails {
    errors: Arc<AtomicU64>,
    restarts_seen: Arc<AtomicU64>,
}

impl Behavior for AlwaysFails {
    type Error = Failure;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), Failure> {
        self.errors.fetch_add(1, Ordering::SeqCst);
        Err(Failure)
    }

    fn post_restart(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), Failure> {
        self.restarts_seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn restart_on_error_rebuilds_behavior() {
    let system = small_system();
    let errors = Arc::new(AtomicU64::new(0));
    let restarts_seen = Arc::new(AtomicU64::new(0));
    let errors_for_factory = Arc::clone(&errors);
    let restarts_for_factory = Arc::clone(&restarts_seen);

    let mut opts: SpawnOptions<AlwaysFails> = SpawnOptions::default();
    opts.behavior_factory = Some(Box::new(move || AlwaysFails {
        errors: Arc::clone(&errors_for_factory),
        restarts_seen: Arc::clone(&restarts_for_factory),
    }));

    let actor = system
        .spawn(
            AlwaysFails {
                errors: Arc::clone(&errors),
                restarts_seen: Arc::clone(&restarts_seen),
            },
            opts,
        )
        .expect("spawns");

    actor
        .send(Message::user(actor.id(), actor.id()))
        .expect("delivered");

    assert!(wait_until(Duration::from_secs(2), || {
        restarts_seen.load(Ordering::SeqCst) >= 1
    }));

    system.shutdown().expect("shuts down");
}

#[test]
fn restart_rate_limit_escalates_to_stop() {
    let config = SystemConfig::builder()
        .worker_threads(2)
        .worker_queue_capacity(64)
        .global_queue_capacity(64)
        .mailbox_capacity(64)
        .max_restarts(2)
        .restart_window(Duration::from_secs(30))
        .backoff_initial(Duration::from_millis(1))
        .backoff_max(Duration::from_millis(5))
        .build()
        .expect("valid config");
    let system = ActorSystem::init(config).expect("valid config");
    system.start().expect("starts");

    let errors = Arc::new(AtomicU64::new(0));
    let restarts_seen = Arc::new(AtomicU64::new(0));
    let errors_for_factory = Arc::clone(&errors);
    let restarts_for_factory = Arc::clone(&restarts_seen);

    let mut opts: SpawnOptions<AlwaysFails> = SpawnOptions::default();
    opts.behavior_factory = Some(Box::new(move || AlwaysFails {
        errors: Arc::clone(&errors_for_factory),
        restarts_seen: Arc::clone(&restarts_for_factory),
    }));

    let actor = system
        .spawn(
            AlwaysFails {
                errors: Arc::clone(&errors),
                restarts_seen: Arc::clone(&restarts_seen),
            },
            opts,
        )
        .expect("spawns");

    for _ in 0..10 {
        let _ = actor.send(Message::user(actor.id(), actor.id()));
        std::thread::sleep(Duration::from_millis(5));
    }

    assert!(wait_until(Duration::from_secs(2), || {
        matches!(actor.state(), Some(ActorState::Stopped))
    }));

    system.shutdown().expect("shuts down");
}
