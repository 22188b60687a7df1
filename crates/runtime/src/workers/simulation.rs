//! Simulation worker that owns the authoritative [`combat_core::CombatEngine`].
//!
//! Receives commands from [`crate::RuntimeHandle`], applies them through the
//! [`FrameDriver`], and lets the driver publish drained events to the bus.

use tokio::sync::{mpsc, oneshot};

use combat_content::ContentBundle;
use combat_core::{CastReport, Combatant, EngineSnapshot, EntityId};
use tracing::{debug, info};

use crate::api::{CastCommand, Result, RuntimeError, SpawnRequest};
use crate::driver::FrameDriver;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Feed wall-clock seconds; replies with the frames simulated.
    Advance {
        delta: f32,
        reply: oneshot::Sender<u32>,
    },
    /// Simulate `frames` fixed steps; replies with the frame reached.
    Step {
        frames: u32,
        reply: oneshot::Sender<u64>,
    },
    Cast {
        command: CastCommand,
        reply: oneshot::Sender<Result<CastReport>>,
    },
    Spawn {
        request: SpawnRequest,
        reply: oneshot::Sender<Result<EntityId>>,
    },
    GrantExperience {
        entity: EntityId,
        amount: u64,
        reply: oneshot::Sender<u32>,
    },
    /// Query the combatant with `entity` (read-only copy).
    QueryCombatant {
        entity: EntityId,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    /// Snapshot the engine together with the current frame number.
    Snapshot {
        reply: oneshot::Sender<(u64, EngineSnapshot)>,
    },
    Restore {
        snapshot: Box<EngineSnapshot>,
        reply: oneshot::Sender<()>,
    },
    /// Stop the worker even while handles are still alive.
    Shutdown,
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    driver: FrameDriver,
    content: ContentBundle,
    command_rx: mpsc::Receiver<Command>,
}

impl SimulationWorker {
    pub fn new(
        driver: FrameDriver,
        content: ContentBundle,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        info!(
            target: "runtime::worker",
            combatants = driver.engine().roster().len(),
            step = driver.step_seconds(),
            "SimulationWorker initialized"
        );
        Self {
            driver,
            content,
            command_rx,
        }
    }

    /// Main worker loop. Ends on [`Command::Shutdown`] or when every handle
    /// is dropped.
    pub async fn run(mut self) {
        loop {
            match self.command_rx.recv().await {
                Some(Command::Shutdown) => {
                    info!(target: "runtime::worker", "Shutdown command received");
                    break;
                }
                Some(cmd) => self.handle_command(cmd),
                None => {
                    debug!(target: "runtime::worker", "Command channel closed");
                    break;
                }
            }
        }
        debug!(target: "runtime::worker", frame = self.driver.frame(), "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Advance { delta, reply } => {
                let frames = self.driver.advance(delta).len() as u32;
                respond(reply, frames, "Advance");
            }
            Command::Step { frames, reply } => {
                for _ in 0..frames {
                    self.driver.step();
                }
                respond(reply, self.driver.frame(), "Step");
            }
            Command::Cast { command, reply } => {
                let result = self
                    .driver
                    .engine_mut()
                    .cast(command.caster, command.spell.as_str(), command.target)
                    .map_err(RuntimeError::from);
                respond(reply, result, "Cast");
            }
            Command::Spawn { request, reply } => {
                let result = self.spawn(request);
                respond(reply, result, "Spawn");
            }
            Command::GrantExperience {
                entity,
                amount,
                reply,
            } => {
                let gained = self.driver.engine_mut().grant_experience(entity, amount);
                respond(reply, gained, "GrantExperience");
            }
            Command::QueryCombatant { entity, reply } => {
                let combatant = self.driver.engine().combatant(entity).cloned();
                respond(reply, combatant, "QueryCombatant");
            }
            Command::Snapshot { reply } => {
                let snapshot = self.driver.engine().snapshot();
                respond(reply, (self.driver.frame(), snapshot), "Snapshot");
            }
            Command::Restore { snapshot, reply } => {
                self.driver.engine_mut().restore(&snapshot);
                respond(reply, (), "Restore");
            }
            // Handled by the run loop.
            Command::Shutdown => {}
        }
    }

    fn spawn(&mut self, request: SpawnRequest) -> Result<EntityId> {
        let engine = self.driver.engine_mut();
        match request {
            SpawnRequest::Character {
                name,
                class,
                position,
            } => self
                .content
                .spawn_character(engine, &name, &class, position)
                .ok_or(RuntimeError::UnknownClass(class)),
            SpawnRequest::Creature { template, position } => Ok(self
                .content
                .spawn_creature(engine, &template, position)?),
        }
    }
}

fn respond<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::worker", command, "reply channel closed (caller dropped)");
    }
}
