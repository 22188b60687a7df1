//! Cast provider abstraction.
//!
//! Providers decide which casts player-controlled combatants attempt each
//! frame. Creatures are driven by [`crate::ai::CreatureAi`] inside the worker.

use async_trait::async_trait;
use tokio::sync::Mutex;

use combat_core::{CastTarget, EngineSnapshot, EntityId, SpellId};

use super::errors::Result;

/// One cast request.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CastCommand {
    pub caster: EntityId,
    pub spell: SpellId,
    pub target: CastTarget,
}

impl CastCommand {
    pub fn new(caster: EntityId, spell: impl Into<SpellId>, target: CastTarget) -> Self {
        Self {
            caster,
            spell: spell.into(),
            target,
        }
    }
}

/// Source of player casts.
#[async_trait]
pub trait CastProvider: Send + Sync {
    /// Casts to attempt before `frame` is simulated.
    async fn provide_casts(&self, frame: u64, world: &EngineSnapshot) -> Result<Vec<CastCommand>>;
}

/// Provider that never casts.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleProvider;

#[async_trait]
impl CastProvider for IdleProvider {
    async fn provide_casts(&self, _frame: u64, _world: &EngineSnapshot) -> Result<Vec<CastCommand>> {
        Ok(Vec::new())
    }
}

/// Provider replaying casts keyed by frame number.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<Vec<(u64, CastCommand)>>,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = (u64, CastCommand)>) -> Self {
        let mut script: Vec<_> = script.into_iter().collect();
        // Stable: commands queued for one frame keep their order.
        script.sort_by_key(|(frame, _)| *frame);
        Self {
            script: Mutex::new(script),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl CastProvider for ScriptedProvider {
    async fn provide_casts(&self, frame: u64, _world: &EngineSnapshot) -> Result<Vec<CastCommand>> {
        let mut script = self.script.lock().await;
        let due = script.partition_point(|(at, _)| *at <= frame);
        Ok(script.drain(..due).map(|(_, command)| command).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_provider_releases_due_commands() {
        let punch = |id| CastCommand::new(EntityId(id), "Heavy Punch", CastTarget::Caster);
        let provider = ScriptedProvider::new([(3, punch(1)), (1, punch(2)), (1, punch(3))]);
        let world = EngineSnapshot::default();

        assert!(provider.provide_casts(0, &world).await.unwrap().is_empty());

        let first = provider.provide_casts(2, &world).await.unwrap();
        assert_eq!(
            first.iter().map(|c| c.caster).collect::<Vec<_>>(),
            vec![EntityId(2), EntityId(3)]
        );
        assert_eq!(provider.remaining().await, 1);

        assert_eq!(provider.provide_casts(3, &world).await.unwrap().len(), 1);
        assert_eq!(provider.remaining().await, 0);
    }

    #[tokio::test]
    async fn idle_provider_is_empty() {
        let casts = IdleProvider
            .provide_casts(10, &EngineSnapshot::default())
            .await
            .unwrap();
        assert!(casts.is_empty());
    }
}
