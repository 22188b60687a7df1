//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up the command channel and
//! the event bus, and exposes a builder-based API for clients to drive the
//! simulation one frame at a time.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use combat_content::ContentBundle;
use combat_core::{CombatEngine, Topic};

use crate::ai::CreatureAi;
use crate::api::{CastProvider, IdleProvider, Result, RuntimeError, RuntimeHandle};
use crate::clock::FixedStepClock;
use crate::driver::FrameDriver;
use crate::events::{EventBus, FrameEvent};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Seconds per simulation frame.
    pub frame_step: f32,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Let creatures attack on their own (default: true)
    pub creature_ai: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_step: FixedStepClock::DEFAULT_STEP,
            event_buffer_size: 256,
            command_buffer_size: 32,
            creature_ai: true,
        }
    }
}

/// Main runtime that orchestrates the combat simulation
///
/// Design: Runtime owns the worker and the cast provider.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    provider: Box<dyn CastProvider>,
    frame: u64,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to combat events on one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<FrameEvent> {
        self.handle.subscribe(topic)
    }

    /// Frames simulated through [`Runtime::step`] so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Runs one frame: asks the provider for casts, submits them, then
    /// simulates one fixed step.
    ///
    /// Rejected casts are expected gameplay and do not fail the step.
    pub async fn step(&mut self) -> Result<u64> {
        let (frame, world) = self.handle.snapshot().await?;
        let casts = self.provider.provide_casts(frame + 1, &world).await?;

        for command in casts {
            match self.handle.cast(command.clone()).await {
                Ok(_) => {}
                Err(RuntimeError::Cast(reason)) => {
                    debug!(
                        target: "runtime",
                        caster = %command.caster,
                        spell = %command.spell,
                        %reason,
                        "provided cast rejected"
                    );
                }
                Err(other) => return Err(other),
            }
        }

        self.frame = self.handle.step(1).await?;
        Ok(self.frame)
    }

    /// Runs `frames` consecutive steps.
    pub async fn run_for(&mut self, frames: u64) -> Result<u64> {
        for _ in 0..frames {
            self.step().await?;
        }
        Ok(self.frame)
    }

    /// Set the cast provider
    pub fn set_provider(&mut self, provider: impl CastProvider + 'static) {
        self.provider = Box::new(provider);
    }

    /// Shutdown the runtime gracefully
    ///
    /// Handle clones still held elsewhere fail with
    /// [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn shutdown(self) -> Result<()> {
        if self.handle.shutdown().await.is_err() {
            debug!(target: "runtime", "worker already stopped");
        }
        drop(self.handle);
        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<ContentBundle>,
    engine: Option<CombatEngine>,
    provider: Option<Box<dyn CastProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            engine: None,
            provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required content
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = Some(content);
        self
    }

    /// Start from a prepared engine instead of an empty one built from content
    pub fn engine(mut self, engine: CombatEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the player cast provider (default: [`IdleProvider`])
    pub fn provider(mut self, provider: impl CastProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker on the current tokio runtime
    pub async fn build(self) -> Result<Runtime> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let engine = self.engine.unwrap_or_else(|| content.build_engine());

        let bus = EventBus::with_capacity(self.config.event_buffer_size);
        let mut driver = FrameDriver::new(engine, self.config.frame_step)?.with_bus(bus.clone());
        if self.config.creature_ai {
            driver = driver.with_ai(CreatureAi::new(content.config().rng_seed));
        }

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let handle = RuntimeHandle::new(command_tx, bus);

        let worker = SimulationWorker::new(driver, content, command_rx);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            provider: self.provider.unwrap_or_else(|| Box::new(IdleProvider)),
            frame: 0,
            worker_handle,
        })
    }
}
