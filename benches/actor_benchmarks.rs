//! Actor lifecycle benchmarks.
//!
//! Measures baseline costs of spawning actors and processing messages
//! through a single actor's drain loop, independent of scheduler
//! contention (covered separately in `scheduler_benchmarks`).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use airssys_rt::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("bench actor error")]
struct BenchError;

struct CounterActor {
    total: u64,
}

impl Behavior for CounterActor {
    type Error = BenchError;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, msg: &Message) -> Result<(), BenchError> {
        self.total += *msg.data().first().unwrap_or(&0) as u64;
        Ok(())
    }
}

fn value_message(id: ActorId, value: u8) -> Message {
    Message::user(id, id).with_data(&[value]).unwrap()
}

/// Benchmark: spawn a single actor under a started system.
fn actor_spawn_single(c: &mut Criterion) {
    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("starts");

    c.bench_function("actor_spawn_single", |b| {
        b.iter(|| {
            let actor = system
                .spawn(CounterActor { total: 0 }, SpawnOptions::default())
                .expect("spawns");
            black_box(actor.id());
            let _ = actor.stop();
        });
    });
}

/// Benchmark: spawn a batch of 10 actors.
fn actor_spawn_batch_small(c: &mut Criterion) {
    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("starts");

    c.bench_function("actor_spawn_batch_small", |b| {
        b.iter(|| {
            let mut actors = Vec::with_capacity(10);
            for _ in 0..10 {
                let actor = system
                    .spawn(CounterActor { total: 0 }, SpawnOptions::default())
                    .expect("spawns");
                actors.push(actor);
            }
            for actor in &actors {
                let _ = actor.stop();
            }
            black_box(actors);
        });
    });
}

/// Benchmark: sustained message processing on one actor.
fn actor_message_throughput(c: &mut Criterion) {
    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("starts");
    let done = Arc::new(AtomicU64::new(0));

    struct Signaling {
        done: Arc<AtomicU64>,
    }
    impl Behavior for Signaling {
        type Error = BenchError;
        fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), BenchError> {
            self.done.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    let actor = system
        .spawn(
            Signaling {
                done: Arc::clone(&done),
            },
            SpawnOptions::default(),
        )
        .expect("spawns");

    c.bench_function("actor_message_throughput", |b| {
        b.iter(|| {
            let start = done.load(Ordering::Relaxed);
            for i in 0..100 {
                let _ = actor.send(value_message(actor.id(), i));
            }
            while done.load(Ordering::Relaxed) < start + 100 {
                std::hint::spin_loop();
            }
        });
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        actor_spawn_single,
        actor_spawn_batch_small,
        actor_message_throughput
}

criterion_main!(benches);
