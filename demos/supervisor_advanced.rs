//! Advanced Supervision - Custom Decisions, Parented Actors, Backoff Limits
//!
//! Shows three things the basic examples don't:
//! - a custom `Supervisor` that inspects the error's message to choose a
//!   strategy instead of returning one fixed strategy,
//! - a parent/child spawn relationship (`SpawnOptions::parent`), and
//! - a tight restart budget that exhausts and escalates the actor to
//!   `Stop` once `max_restarts` is exceeded within the restart window.
//!
//! Run with: cargo run --example supervisor_advanced

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use airssys_rt::prelude::*;

#[derive(Debug, thiserror::Error)]
enum TaskError {
    #[error("transient hiccup")]
    Transient,
    #[error("fatal: {0}")]
    Fatal(&'static str),
}

/// Restarts transient errors, stops on anything fatal.
struct ErrorAwareSupervisor;

impl Supervisor for ErrorAwareSupervisor {
    fn decide(
        &self,
        actor: ActorId,
        error: &(dyn std::error::Error + Send + Sync + 'static),
    ) -> SupervisorStrategy {
        let message = error.to_string();
        if message.starts_with("fatal") {
            println!("   supervisor: {actor} raised a fatal error, stopping it");
            SupervisorStrategy::Stop
        } else {
            println!("   supervisor: {actor} raised a transient error, restarting it");
            SupervisorStrategy::Restart
        }
    }
}

struct Task {
    calls: Arc<AtomicU32>,
}

impl Behavior for Task {
    type Error = TaskError;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, msg: &Message) -> Result<(), TaskError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match msg.data().first() {
            Some(1) => Err(TaskError::Transient),
            Some(2) => Err(TaskError::Fatal("out of retries")),
            _ => {
                println!("   task processed call #{call} normally");
                Ok(())
            }
        }
    }
}

fn opcode(id: ActorId, op: u8) -> Message {
    Message::user(id, id).with_data(&[op]).expect("one byte fits inline")
}

fn custom_decisions() {
    println!("1. Custom error-aware supervisor...");
    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("scheduler starts");

    let calls = Arc::new(AtomicU32::new(0));
    let mut opts: SpawnOptions<Task> = SpawnOptions::default();
    opts.supervisor = Some(Arc::new(ErrorAwareSupervisor));
    opts.behavior_factory = Some(Box::new({
        let calls = Arc::clone(&calls);
        move || Task { calls: Arc::clone(&calls) }
    }));
    let task = system
        .spawn(Task { calls: Arc::clone(&calls) }, opts)
        .expect("spawns");

    task.send(opcode(task.id(), 1)).expect("delivered"); // transient -> restart
    std::thread::sleep(Duration::from_millis(60));
    println!("   after transient error: {:?}", task.state());

    task.send(opcode(task.id(), 2)).expect("delivered"); // fatal -> stop
    std::thread::sleep(Duration::from_millis(60));
    println!("   after fatal error: {:?}\n", task.state());

    system.shutdown().expect("shuts down cleanly");
}

struct Parent;
struct Child;

#[derive(Debug, thiserror::Error)]
#[error("child/parent demo error")]
struct DemoError;

impl Behavior for Parent {
    type Error = DemoError;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), DemoError> {
        Ok(())
    }
}

impl Behavior for Child {
    type Error = DemoError;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), DemoError> {
        Ok(())
    }
}

fn parented_actors() {
    println!("2. Parent/child relationship...");
    let system = ActorSystem::init(SystemConfig::default()).expect("valid config");
    system.start().expect("scheduler starts");

    let parent = system.spawn(Parent, SpawnOptions::default()).expect("spawns parent");
    let mut child_opts: SpawnOptions<Child> = SpawnOptions::default();
    child_opts.parent = Some(parent.id());
    let child = system.spawn(Child, child_opts).expect("spawns child");

    println!("   parent {} has child {}", parent.id(), child.id());
    // Shutdown stops children before their parents, so the child's
    // post_stop hook always runs while the parent is still Running.
    system.shutdown().expect("shuts down cleanly");
    println!();
}

struct AlwaysFails {
    errors: Arc<AtomicU32>,
}

impl Behavior for AlwaysFails {
    type Error = TaskError;

    fn receive(&mut self, _ctx: &mut ActorContext<'_>, _msg: &Message) -> Result<(), TaskError> {
        self.errors.fetch_add(1, Ordering::SeqCst);
        Err(TaskError::Transient)
    }
}

fn exhausted_restart_budget() {
    println!("3. Exhausting the restart budget...");
    let config = SystemConfig::builder()
        .max_restarts(2)
        .restart_window(Duration::from_secs(10))
        .backoff_initial(Duration::from_millis(1))
        .backoff_max(Duration::from_millis(5))
        .build()
        .expect("valid config");
    let system = ActorSystem::init(config).expect("valid config");
    system.start().expect("scheduler starts");

    let errors = Arc::new(AtomicU32::new(0));
    let errors_for_factory = Arc::clone(&errors);
    let mut opts: SpawnOptions<AlwaysFails> = SpawnOptions::default();
    opts.behavior_factory = Some(Box::new(move || AlwaysFails {
        errors: Arc::clone(&errors_for_factory),
    }));
    let actor = system
        .spawn(AlwaysFails { errors: Arc::clone(&errors) }, opts)
        .expect("spawns");

    for round in 1..=6 {
        let _ = actor.send(Message::user(actor.id(), actor.id()));
        std::thread::sleep(Duration::from_millis(20));
        println!("   round {round}: state = {:?}", actor.state());
    }

    system.shutdown().expect("shuts down cleanly");
}

fn main() {
    println!("=== Advanced Supervision ===\n");
    custom_decisions();
    parented_actors();
    exhausted_restart_budget();
    println!("\n=== Done ===");
}
