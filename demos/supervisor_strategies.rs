//! Supervision Strategy Comparison
//!
//! Spawns four otherwise-identical actors, each under a supervisor fixed to
//! a different strategy, and shows how each reacts to the same error:
//! - `Resume`:   error is swallowed, actor keeps running
//! - `Restart`:  behavior is rebuilt, actor keeps running
//! - `Stop`:     actor transitions to `Stopped`
//! - `Escalate`: with no parent, falls back to the root policy (`Stop`)
//!
//! Run with: cargo run --example supervisor_strategies

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use airssys_rt::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("intentional failure")]
struct Failure;

struct FixedStrategy {
    strategy: SupervisorStrategy,
}

impl Supervisor for FixedStrategy {
    fn decide(
        &self,
        _actor: ActorId,
        _error: &(dyn std::error::Error + Send + Sync + 'static),
    ) -> SupervisorStrategy {
        self.strategy
    }
}

struct FailOnce {
    failed: Arc<AtomicU32>,
    restarted: Arc<AtomicU32>,
}

impl Behavior for FailOnce {
    type Error = Failure;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), Failure> {
        self.failed.fetch_add(1, Ordering::SeqCst);
        Err(Failure)
    }

    fn post_restart(&mut self, _ctx: &mut ActorContext<'_>) -> Result<(), Failure> {
        self.restarted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn spawn_under(system: &ActorSystem, strategy: SupervisorStrategy) -> (ActorRef, Arc<AtomicU32>, Arc<AtomicU32>) {
    let failed = Arc::new(AtomicU32::new(0));
    let restarted = Arc::new(AtomicU32::new(0));
    let mut opts: SpawnOptions<FailOnce> = SpawnOptions::default();
    opts.supervisor = Some(Arc::new(FixedStrategy { strategy }));
    let actor = system
        .spawn(
            FailOnce {
                failed: Arc::clone(&failed),
                restarted: Arc::clone(&restarted),
            },
            opts,
        )
        .expect("spawns");
    (actor, failed, restarted)
}

fn main() {
    println!("=== Supervisor Strategy Comparison ===\n");

    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("scheduler starts");

    let (resume, _, _) = spawn_under(&system, SupervisorStrategy::Resume);
    let (restart, _, restart_count) = spawn_under(&system, SupervisorStrategy::Restart);
    let (stop, _, _) = spawn_under(&system, SupervisorStrategy::Stop);
    let (escalate, _, _) = spawn_under(&system, SupervisorStrategy::Escalate);

    println!("1. Sending a failing message to each actor...");
    for actor in [&resume, &restart, &stop, &escalate] {
        actor
            .send(Message::user(actor.id(), actor.id()))
            .expect("delivered");
    }
    std::thread::sleep(Duration::from_millis(100));

    println!("\n2. Resulting states:");
    println!("   Resume:   {:?} (error swallowed, kept running)", resume.state());
    println!(
        "   Restart:  {:?} (behavior rebuilt {} time(s))",
        restart.state(),
        restart_count.load(Ordering::SeqCst)
    );
    println!("   Stop:     {:?} (actor stopped)", stop.state());
    println!("   Escalate: {:?} (no parent, falls back to Stop)", escalate.state());

    system.shutdown().expect("shuts down cleanly");
    println!("\n=== Done ===");
}
