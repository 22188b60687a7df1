//! Deterministic combat rules shared by the runtime and offline tools.
//!
//! `combat-core` owns the canonical combat model: attribute-driven stat
//! derivation, the health/resource ledger, spell resolution, cooldowns, the
//! status-effect lifecycle and projectile flight. It performs no I/O. All
//! simulation state is reached through [`engine::CombatEngine`], which is
//! constructed explicitly by the host and advanced from a single `tick`.
pub mod attributes;
pub mod cast;
pub mod class;
pub mod combat;
pub mod config;
pub mod cooldown;
pub mod engine;
pub mod entity;
pub mod error;
pub mod events;
pub mod ids;
pub mod projectile;
pub mod rng;
pub mod roster;
pub mod snapshot;
pub mod spatial;
pub mod spell;
pub mod stats;
pub mod status;
pub mod vitals;

pub use attributes::{AttributeChange, AttributeKind, AttributeModifiers, Attributes};
pub use cast::{CastError, CastReport, CastTarget, SpellEngine};
pub use class::{ClassCatalog, ClassDefinition, ResourceType, SubclassDefinition};
pub use combat::{DamageInfo, DamageType, HitReport};
pub use config::{CombatConfig, ConfigError};
pub use cooldown::{CooldownKey, CooldownTracker};
pub use engine::CombatEngine;
pub use entity::{
    Allegiance, Character, CharacterError, Combatant, Conditions, Creature, Damageable,
    SpellCaster, StatusEffectTarget,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{CombatEvent, EventQueue, EventSink, RemovalReason, Topic};
pub use ids::{EffectId, EntityId, SpellId};
pub use projectile::{Projectile, ProjectileSystem};
pub use rng::{PcgRng, RngOracle};
pub use roster::{Obstacle, Roster};
pub use snapshot::EngineSnapshot;
pub use spatial::{Body, CombatWorld, LayerMask, RayHit, SpatialQuery};
pub use spell::{
    ProjectileProfile, SpellBook, SpellDefinition, SpellType, StatusEffectSpec, TargetingMode,
};
pub use stats::{DerivedStats, Progression, ResourceMaximums, StatBonuses, StatKind, StatSheet};
pub use status::{
    ActiveStatusEffect, EffectVisuals, NoVisuals, StatusEffectKind, StatusEffectManager,
    VisualHandle,
};
pub use vitals::{DamageOutcome, LifeState, Vitals};
