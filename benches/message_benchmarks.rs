//! Message construction and ring/mailbox transport benchmarks.
//!
//! - Raw `Message` construction and payload round-trips
//! - SPSC ring push/pop
//! - Mailbox enqueue/dequeue under the MPSC facade

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use airssys_rt::{Mailbox, Message};
use airssys_rt::util::ActorId;

fn ids() -> (ActorId, ActorId) {
    (ActorId::next(0), ActorId::next(0))
}

/// Benchmark: construct an empty `User` message.
fn message_construct(c: &mut Criterion) {
    c.bench_function("message_construct", |b| {
        let (sender, receiver) = ids();
        b.iter(|| {
            let msg = Message::user(black_box(sender), black_box(receiver));
            black_box(msg);
        });
    });
}

/// Benchmark: construct a message and set a small inline payload.
fn message_with_payload(c: &mut Criterion) {
    c.bench_function("message_with_payload", |b| {
        let (sender, receiver) = ids();
        let payload = [1u8, 2, 3, 4, 5, 6, 7, 8];
        b.iter(|| {
            let msg = Message::user(black_box(sender), black_box(receiver))
                .with_data(&payload)
                .unwrap();
            black_box(msg);
        });
    });
}

/// Benchmark: sustained mailbox enqueue/dequeue, one message at a time.
fn mailbox_enqueue_dequeue(c: &mut Criterion) {
    c.bench_function("mailbox_enqueue_dequeue", |b| {
        let mailbox = Mailbox::new(1024).expect("power of two");
        let (sender, receiver) = ids();
        b.iter(|| {
            let outcome = mailbox.enqueue(Message::user(sender, receiver));
            black_box(outcome);
            black_box(mailbox.drain_one());
        });
    });
}

/// Benchmark: fill a mailbox to capacity, then drain it fully.
fn mailbox_batch_round_trip(c: &mut Criterion) {
    c.bench_function("mailbox_batch_round_trip", |b| {
        let mailbox = Mailbox::new(256).expect("power of two");
        let (sender, receiver) = ids();
        b.iter(|| {
            for _ in 0..200 {
                let _ = mailbox.enqueue(Message::user(sender, receiver));
            }
            let mut drained = 0u32;
            while mailbox.drain_one().is_some() {
                drained += 1;
            }
            black_box(drained);
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
        message_construct,
        message_with_payload,
        mailbox_enqueue_dequeue,
        mailbox_batch_round_trip
}

criterion_main!(benches);
