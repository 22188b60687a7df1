//! Visual collaborator for status effects.
//!
//! The core never renders. When an effect with a visual key is applied, the
//! manager asks the host for an opaque handle and hands it back when the
//! effect ends.

use crate::ids::EntityId;

/// Opaque host-side handle for a spawned visual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualHandle(pub u64);

pub trait EffectVisuals: Send {
    /// Spawns the visual registered under `key` on `target`.
    fn spawn(&mut self, target: EntityId, key: &str) -> Option<VisualHandle>;

    fn release(&mut self, handle: VisualHandle);
}

/// Headless hosts: spawns nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVisuals;

impl EffectVisuals for NoVisuals {
    fn spawn(&mut self, _target: EntityId, _key: &str) -> Option<VisualHandle> {
        None
    }

    fn release(&mut self, _handle: VisualHandle) {}
}
