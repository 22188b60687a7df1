//! Combat notifications.
//!
//! Resolution code never calls listeners directly. It pushes typed
//! [`CombatEvent`]s into an [`EventSink`]; the engine collects them in an
//! [`EventQueue`] that the host drains once per tick and forwards to UI,
//! analytics or a network bus. Mutation order therefore stays deterministic
//! regardless of who is listening.

use glam::Vec2;

use crate::attributes::AttributeChange;
use crate::combat::DamageType;
use crate::ids::{EffectId, EntityId, SpellId};
use crate::status::StatusEffectKind;

/// Coarse event categories for subscription filtering.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Topic {
    Cast,
    Damage,
    Healing,
    Status,
    Lifecycle,
    Progression,
}

impl Topic {
    pub const ALL: [Self; 6] = [
        Self::Cast,
        Self::Damage,
        Self::Healing,
        Self::Status,
        Self::Lifecycle,
        Self::Progression,
    ];
}

/// Why a status effect left its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RemovalReason {
    /// Duration ran out.
    Expired,
    /// Removed explicitly by id.
    Dispelled,
    /// The target left the world.
    TargetGone,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// A cast passed every precondition and paid its cost.
    SpellCast {
        caster: EntityId,
        spell: SpellId,
        target_point: Vec2,
        targets: Vec<EntityId>,
    },

    ProjectileLaunched {
        caster: EntityId,
        spell: SpellId,
        origin: Vec2,
        direction: Vec2,
    },

    /// A projectile detonated; `hit` is the entity it struck, if any.
    ProjectileImpact {
        caster: EntityId,
        spell: SpellId,
        point: Vec2,
        hit: Option<EntityId>,
    },

    DamageDealt {
        source: EntityId,
        target: EntityId,
        amount: i32,
        damage_type: DamageType,
        critical: bool,
        knockback: Vec2,
        remaining_health: i32,
    },

    HealingDone {
        source: EntityId,
        target: EntityId,
        amount: i32,
    },

    EffectApplied {
        source: EntityId,
        target: EntityId,
        effect: EffectId,
        name: String,
        kind: StatusEffectKind,
        /// True when an existing same-name effect had its duration refreshed.
        refreshed: bool,
    },

    EffectRemoved {
        target: EntityId,
        effect: EffectId,
        name: String,
        reason: RemovalReason,
    },

    Death {
        entity: EntityId,
        killer: EntityId,
        experience_lost: u64,
    },

    AttributeChanged {
        entity: EntityId,
        change: AttributeChange,
    },

    ExperienceGained {
        entity: EntityId,
        amount: u64,
    },

    LevelUp {
        entity: EntityId,
        level: u32,
    },
}

impl CombatEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::SpellCast { .. }
            | Self::ProjectileLaunched { .. }
            | Self::ProjectileImpact { .. } => Topic::Cast,
            Self::DamageDealt { .. } => Topic::Damage,
            Self::HealingDone { .. } => Topic::Healing,
            Self::EffectApplied { .. } | Self::EffectRemoved { .. } => Topic::Status,
            Self::Death { .. } => Topic::Lifecycle,
            Self::AttributeChanged { .. }
            | Self::ExperienceGained { .. }
            | Self::LevelUp { .. } => Topic::Progression,
        }
    }
}

/// Destination for combat notifications.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

/// Per-tick event buffer owned by the engine.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<CombatEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    /// Takes every buffered event in emission order.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventQueue {
    fn emit(&mut self, event: CombatEvent) {
        tracing::trace!(target: "combat::events", topic = %event.topic(), ?event, "emit");
        self.events.push(event);
    }
}
