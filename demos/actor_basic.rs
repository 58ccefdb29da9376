//! Basic Actor Example - Core `Behavior` Fundamentals
//!
//! Shows the smallest useful actor: a counter that applies signed deltas
//! sent as single-byte payloads, with `pre_start`/`post_stop` hooks.
//!
//! Run with: cargo run --example actor_basic

use std::time::Duration;

use airssys_rt::prelude::*;

struct CounterActor {
    value: i32,
    processed: u32,
}

#[derive(Debug, thiserror::Error)]
#[error("counter actor error")]
struct CounterError;

impl Behavior for CounterActor {
    type Error = CounterError;

    fn pre_start(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), CounterError> {
        println!(
            "[actor {}] starting with initial value: {}",
            ctx.self_id(),
            self.value
        );
        Ok(())
    }

    fn receive(&mut self, ctx: &mut ActorContext<'_>, msg: &Message) -> Result<(), CounterError> {
        let delta = *msg.data().first().unwrap_or(&0) as i8 as i32;
        self.value += delta;
        self.processed += 1;
        println!(
            "[actor {}] applied delta {delta}, value now {} (messages processed: {})",
            ctx.self_id(),
            self.value,
            self.processed
        );
        Ok(())
    }

    fn post_stop(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), CounterError> {
        println!(
            "[actor {}] stopping with final value {} (processed {} messages)",
            ctx.self_id(),
            self.value,
            self.processed
        );
        Ok(())
    }
}

fn delta_message(id: ActorId, delta: i8) -> Message {
    Message::user(id, id)
        .with_data(&[delta as u8])
        .expect("one byte fits inline")
}

fn main() {
    println!("=== Basic Actor Example ===\n");

    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("scheduler starts");

    println!("1. Starting actor...");
    let counter = system
        .spawn(
            CounterActor {
                value: 0,
                processed: 0,
            },
            SpawnOptions::default(),
        )
        .expect("spawns");
    println!("   actor state: {:?}\n", counter.state());

    println!("2. Processing messages...");
    for delta in [10, 20, 15] {
        counter
            .send(delta_message(counter.id(), delta))
            .expect("delivered");
    }
    std::thread::sleep(Duration::from_millis(50));

    println!("\n3. Stopping actor...");
    counter.stop().expect("stop requested");
    std::thread::sleep(Duration::from_millis(50));

    println!("\n4. Final state:");
    println!("   state: {:?}", counter.state());
    println!(
        "   metrics: {:?}",
        counter.metrics().map(|m| m.messages_processed)
    );

    system.shutdown().expect("shuts down cleanly");
}
