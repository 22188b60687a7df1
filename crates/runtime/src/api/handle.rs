//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! casting, stepping the simulation or streaming events from specific topics.
use std::collections::HashMap;

use glam::Vec2;
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{CastReport, Combatant, EngineSnapshot, EntityId, Topic};

use super::errors::{Result, RuntimeError};
use super::providers::CastCommand;
use crate::events::{EventBus, FrameEvent};
use crate::workers::Command;

/// What to add to the running simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnRequest {
    /// A level-1 character of a class from the loaded content.
    Character {
        name: String,
        class: String,
        position: Vec2,
    },
    /// A creature stamped from a template.
    Creature { template: String, position: Vec2 },
}

/// Client-facing handle to interact with the runtime
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Feeds wall-clock seconds to the fixed-step clock.
    ///
    /// Returns the number of frames simulated.
    pub async fn advance(&self, delta: f32) -> Result<u32> {
        self.request(|reply| Command::Advance { delta, reply }).await
    }

    /// Simulates `frames` fixed steps and returns the frame reached.
    pub async fn step(&self, frames: u32) -> Result<u64> {
        self.request(|reply| Command::Step { frames, reply }).await
    }

    pub async fn cast(&self, command: CastCommand) -> Result<CastReport> {
        self.request(|reply| Command::Cast { command, reply })
            .await?
    }

    pub async fn spawn(&self, request: SpawnRequest) -> Result<EntityId> {
        self.request(|reply| Command::Spawn { request, reply })
            .await?
    }

    /// Grants experience to a character; returns the levels gained.
    pub async fn grant_experience(&self, entity: EntityId, amount: u64) -> Result<u32> {
        self.request(|reply| Command::GrantExperience {
            entity,
            amount,
            reply,
        })
        .await
    }

    pub async fn combatant(&self, entity: EntityId) -> Result<Option<Combatant>> {
        self.request(|reply| Command::QueryCombatant { entity, reply })
            .await
    }

    /// Current frame and engine snapshot.
    pub async fn snapshot(&self) -> Result<(u64, EngineSnapshot)> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn restore(&self, snapshot: EngineSnapshot) -> Result<()> {
        self.request(|reply| Command::Restore {
            snapshot: Box::new(snapshot),
            reply,
        })
        .await
    }

    /// Asks the worker to stop. Commands queued behind this one are dropped.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut damage_rx = handle.subscribe(Topic::Damage);
    /// while let Ok(frame_event) = damage_rx.recv().await {
    ///     // Handle damage events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<FrameEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<FrameEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
