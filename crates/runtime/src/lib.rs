//! Host-side orchestration for the combat simulation.
//!
//! The combat core is synchronous and tick-driven. This crate supplies the
//! pieces a host wraps around it:
//! - [`clock`] turns wall-clock deltas into fixed simulation steps
//! - [`driver`] advances one frame: creature AI, engine tick, event fan-out
//! - [`ai`] reproduces the enemy attack loop (timer, range check, random spell)
//! - [`events`] provides the topic-based event bus frames are published to
//! - [`runtime`] hosts the async orchestrator and builder, with a worker task
//!   that owns the engine and a cloneable [`RuntimeHandle`]
//! - [`scenario`] runs scripted fights headless, for tests and tooling
pub mod ai;
pub mod api;
pub mod clock;
pub mod driver;
pub mod events;
pub mod runtime;
pub mod scenario;

mod workers;

pub use ai::{AiDecision, CreatureAi};
pub use api::{
    CastCommand, CastProvider, IdleProvider, Result, RuntimeError, RuntimeHandle,
    ScriptedProvider, SpawnRequest,
};
pub use clock::FixedStepClock;
pub use driver::{FrameDriver, FrameOutput};
pub use events::{EventBus, FrameEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::{
    CastOutcome, CastRecord, CastSource, CombatantSummary, Scenario, ScenarioObstacle,
    ScenarioOutcome, ScenarioReport, ScenarioRunner, ScenarioSpawn, ScriptTarget, ScriptedCast,
};
