//! Basic Supervisor Usage - Restart on Error
//!
//! A worker that fails once is restarted automatically by the system's
//! default supervisor, rebuilding its behavior from a factory closure.
//!
//! Run with: cargo run --example supervisor_basic

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use airssys_rt::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("worker tripped on attempt {attempt}")]
struct WorkerError {
    attempt: u32,
}

struct FlakyWorker {
    attempts: Arc<AtomicU32>,
    restarts: Arc<AtomicU32>,
}

impl Behavior for FlakyWorker {
    type Error = WorkerError;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), WorkerError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == 1 {
            println!("   worker fails on its first message");
            return Err(WorkerError { attempt });
        }
        println!("   worker processed attempt {attempt} without error");
        Ok(())
    }

    fn post_restart(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), WorkerError> {
        let n = self.restarts.fetch_add(1, Ordering::SeqCst) + 1;
        println!("   post_restart: actor {} rebuilt (restart #{n})", ctx.self_id());
        Ok(())
    }
}

fn main() {
    println!("=== Supervisor Basics ===\n");

    let config = SystemConfig::builder()
        .supervisor_strategy(SupervisorStrategy::Restart)
        .build()
        .expect("valid config");
    let system = ActorSystem::init(config).expect("valid config");
    system.start().expect("scheduler starts");

    println!("1. Spawning a worker that fails on its first message...");
    let attempts = Arc::new(AtomicU32::new(0));
    let restarts = Arc::new(AtomicU32::new(0));
    let attempts_for_factory = Arc::clone(&attempts);
    let restarts_for_factory = Arc::clone(&restarts);

    let mut opts: SpawnOptions<FlakyWorker> = SpawnOptions::default();
    opts.behavior_factory = Some(Box::new(move || FlakyWorker {
        attempts: Arc::clone(&attempts_for_factory),
        restarts: Arc::clone(&restarts_for_factory),
    }));

    let worker = system
        .spawn(
            FlakyWorker {
                attempts: Arc::clone(&attempts),
                restarts: Arc::clone(&restarts),
            },
            opts,
        )
        .expect("spawns");

    println!("\n2. Sending the failing message...");
    worker
        .send(Message::user(worker.id(), worker.id()))
        .expect("delivered");
    std::thread::sleep(Duration::from_millis(100));
    println!("   state after failure + restart: {:?}", worker.state());

    println!("\n3. Sending a follow-up message to the restarted actor...");
    worker
        .send(Message::user(worker.id(), worker.id()))
        .expect("delivered");
    std::thread::sleep(Duration::from_millis(100));

    println!("\n4. Summary: restarts observed = {}", restarts.load(Ordering::SeqCst));
    system.shutdown().expect("shuts down cleanly");
    println!("\n=== Done ===");
}
