//! Actor Lifecycle - Observing State Transitions
//!
//! Walks an actor through `Created -> Starting -> Running -> Stopping ->
//! Stopped`, printing the observed state after each transition-triggering
//! call.
//!
//! Run with: cargo run --example actor_lifecycle

use std::time::Duration;

use airssys_rt::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("lifecycle demo error")]
struct DemoError;

struct Greeter {
    name: &'static str,
}

impl Behavior for Greeter {
    type Error = DemoError;

    fn pre_start(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), DemoError> {
        println!("   pre_start:  actor {} ({}) is coming up", ctx.self_id(), self.name);
        Ok(())
    }

    fn receive(&mut self, ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), DemoError> {
        println!("   receive:    {} ({}) handled a message", ctx.self_id(), self.name);
        Ok(())
    }

    fn post_stop(&mut self, ctx: &mut ActorContext<'_>) -> Result<(), DemoError> {
        println!("   post_stop:  actor {} ({}) has gone down", ctx.self_id(), self.name);
        Ok(())
    }
}

fn report(label: &str, actor: &ActorRef) {
    println!("   [{label}] state = {:?}", actor.state());
}

fn main() {
    println!("=== Actor Lifecycle ===\n");

    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");

    println!("1. Spawning before the scheduler starts (state: Created -> Starting -> Running)...");
    let greeter = system
        .spawn(Greeter { name: "alice" }, SpawnOptions::default())
        .expect("spawns");
    report("just spawned", &greeter);

    println!("\n2. Starting the scheduler, so pre_start and drain can run...");
    system.start().expect("scheduler starts");
    std::thread::sleep(Duration::from_millis(30));
    report("after start", &greeter);

    println!("\n3. Sending a message while Running...");
    greeter
        .send(Message::user(greeter.id(), greeter.id()))
        .expect("delivered");
    std::thread::sleep(Duration::from_millis(30));
    report("after message", &greeter);

    println!("\n4. Stopping the actor (Running -> Stopping -> Stopped)...");
    greeter.stop().expect("stop requested");
    std::thread::sleep(Duration::from_millis(30));
    report("after stop", &greeter);

    println!("\n5. A second stop() is a no-op (already Stopped)...");
    let _ = greeter.stop();
    report("after second stop", &greeter);

    system.shutdown().expect("shuts down cleanly");
    println!("\n=== Done ===");
}
