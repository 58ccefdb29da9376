//! Mailbox contention benchmarks.
//!
//! Isolates the mailbox's producer-side critical section under
//! multi-sender contention, separately from the single-thread
//! enqueue/dequeue path already covered in `message_benchmarks`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use airssys_rt::util::ActorId;
use airssys_rt::{Mailbox, Message};

/// Benchmark: a single sender racing the mailbox's own drain, capacity
/// never reached (steady-state non-blocking path).
fn mailbox_single_sender_steady_state(c: &mut Criterion) {
    c.bench_function("mailbox_single_sender_steady_state", |b| {
        let mailbox = Mailbox::new(64).expect("power of two");
        let sender = ActorId::next(0);
        let receiver = ActorId::next(0);
        b.iter(|| {
            for _ in 0..32 {
                let _ = mailbox.enqueue(Message::user(sender, receiver));
            }
            for _ in 0..32 {
                black_box(mailbox.drain_one());
            }
        });
    });
}

/// Benchmark: four sender threads contending on one mailbox's producer
/// lock, drained in bulk after the round completes.
fn mailbox_four_way_contention(c: &mut Criterion) {
    c.bench_function("mailbox_four_way_contention", |b| {
        b.iter(|| {
            let mailbox = Arc::new(Mailbox::new(4096).expect("power of two"));
            let receiver = ActorId::next(0);
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let mailbox = Arc::clone(&mailbox);
                    std::thread::spawn(move || {
                        let sender = ActorId::next(0);
                        for _ in 0..250 {
                            let _ = mailbox.enqueue(Message::user(sender, receiver));
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().unwrap();
            }
            let mut drained = 0u32;
            while mailbox.drain_one().is_some() {
                drained += 1;
            }
            black_box(drained);
        });
    });
}

/// Benchmark: `is_pending`/`mark_idle` bookkeeping overhead in isolation.
fn mailbox_pending_flag_round_trip(c: &mut Criterion) {
    c.bench_function("mailbox_pending_flag_round_trip", |b| {
        let mailbox = Mailbox::new(64).expect("power of two");
        let sender = ActorId::next(0);
        let receiver = ActorId::next(0);
        b.iter(|| {
            let _ = mailbox.enqueue(Message::user(sender, receiver));
            black_box(mailbox.is_pending());
            mailbox.drain_one();
            black_box(mailbox.mark_idle());
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
        mailbox_single_sender_steady_state,
        mailbox_four_way_contention,
        mailbox_pending_flag_round_trip
}

criterion_main!(benches);
