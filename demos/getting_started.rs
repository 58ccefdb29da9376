//! Getting Started - Your First Actor
//!
//! Builds a counter actor, spawns it under a running system, sends it a
//! few messages, and shuts the system down.
//!
//! Run with: cargo run --example getting_started

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use airssys_rt::prelude::*;

#[derive(Debug, thiserror::Error)]
enum CounterError {
    #[error("shutdown requested")]
    ShutdownRequested,
}

struct CounterActor {
    value: Arc<AtomicI32>,
}

impl Behavior for CounterActor {
    type Error = CounterError;

    fn pre_start(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), CounterError> {
        println!("   actor starting");
        Ok(())
    }

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, msg: &Message) -> Result<(), CounterError> {
        match msg.data().first() {
            Some(1) => {
                let v = self.value.fetch_add(1, Ordering::SeqCst) + 1;
                println!("   counter incremented to {v}");
            }
            Some(2) => {
                let v = self.value.fetch_sub(1, Ordering::SeqCst) - 1;
                println!("   counter decremented to {v}");
            }
            Some(3) => {
                println!("   current value: {}", self.value.load(Ordering::SeqCst));
            }
            _ => return Err(CounterError::ShutdownRequested),
        }
        Ok(())
    }

    fn post_stop(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), CounterError> {
        println!("   actor stopped");
        Ok(())
    }
}

fn counter_message(sender: ActorId, receiver: ActorId, op: u8) -> Message {
    Message::user(sender, receiver)
        .with_data(&[op])
        .expect("one byte fits inline")
}

fn main() {
    println!("=== Getting Started ===\n");

    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("scheduler starts");

    println!("1. Spawning actor...");
    let value = Arc::new(AtomicI32::new(0));
    let counter = system
        .spawn(
            CounterActor {
                value: Arc::clone(&value),
            },
            SpawnOptions::default(),
        )
        .expect("spawns");
    println!("   actor id: {}\n", counter.id());

    println!("2. Sending messages...");
    for op in [1u8, 1, 3, 2, 3] {
        counter
            .send(counter_message(counter.id(), counter.id(), op))
            .expect("delivered");
    }
    std::thread::sleep(Duration::from_millis(50));

    println!("\n3. Shutting down...");
    counter.stop().expect("stop requested");
    std::thread::sleep(Duration::from_millis(50));

    println!("\n4. Final state: {:?}", counter.state());
    system.shutdown().expect("shuts down cleanly");
    println!("\n=== Done ===");
}
