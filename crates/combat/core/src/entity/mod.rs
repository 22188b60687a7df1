//! Combat entities and the capabilities they expose.
//!
//! The entity set is closed: every participant is either a player-side
//! [`Character`] or a [`Creature`]. Resolution code talks to them through the
//! capability traits below and dispatches over [`Combatant`] instead of
//! probing types at runtime.

pub mod character;
pub mod conditions;
pub mod creature;

pub use character::{Character, CharacterError, CharacterRules};
pub use conditions::{Conditions, StatusModifier};
pub use creature::Creature;

use glam::Vec2;

use crate::attributes::Attributes;
use crate::combat::DamageInfo;
use crate::ids::{EffectId, EntityId};
use crate::spatial::{Body, LayerMask};
use crate::stats::StatSheet;
use crate::vitals::{DamageOutcome, Vitals};

/// Which side a combatant fights on.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Allegiance {
    #[default]
    Player,
    Ally,
    Enemy,
}

impl Allegiance {
    /// Collision layer a combatant of this allegiance occupies.
    pub const fn layer(self) -> LayerMask {
        match self {
            Self::Player => LayerMask::PLAYER,
            Self::Ally => LayerMask::ALLY,
            Self::Enemy => LayerMask::ENEMY,
        }
    }

    pub const fn hostile_layers(self) -> LayerMask {
        match self {
            Self::Player | Self::Ally => LayerMask::ENEMY,
            Self::Enemy => LayerMask::FRIENDLY,
        }
    }

    pub const fn friendly_layers(self) -> LayerMask {
        match self {
            Self::Player | Self::Ally => LayerMask::FRIENDLY,
            Self::Enemy => LayerMask::ENEMY,
        }
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Anything that can be hurt and healed.
pub trait Damageable {
    fn take_damage(&mut self, info: &DamageInfo) -> DamageOutcome;

    /// Returns the health actually restored.
    fn heal(&mut self, amount: i32) -> i32;

    fn is_dead(&self) -> bool;
}

/// Anything that can cast spells.
pub trait SpellCaster {
    fn caster_id(&self) -> EntityId;

    fn caster_attributes(&self) -> &Attributes;

    fn is_stunned(&self) -> bool;

    /// Current pool size, or `None` for casters without a resource pool.
    fn available_resource(&self) -> Option<i32>;

    /// Spends resource. Casters without a pool always succeed.
    fn consume_resource(&mut self, amount: i32) -> bool;
}

/// Anything status effects can attach reversible modifiers to.
pub trait StatusEffectTarget {
    fn attach_modifier(&mut self, id: EffectId, modifier: StatusModifier);

    fn detach_modifier(&mut self, id: EffectId) -> Option<StatusModifier>;
}

// ============================================================================
// Combatant
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combatant {
    Character(Character),
    Creature(Creature),
}

macro_rules! delegate {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            Combatant::Character($inner) => $body,
            Combatant::Creature($inner) => $body,
        }
    };
}

impl Combatant {
    pub fn id(&self) -> EntityId {
        delegate!(self, c => c.id())
    }

    pub fn name(&self) -> &str {
        delegate!(self, c => c.name())
    }

    pub fn level(&self) -> u32 {
        delegate!(self, c => c.level())
    }

    pub fn body(&self) -> &Body {
        delegate!(self, c => c.body())
    }

    pub fn body_mut(&mut self) -> &mut Body {
        delegate!(self, c => c.body_mut())
    }

    pub fn position(&self) -> Vec2 {
        self.body().position
    }

    pub fn allegiance(&self) -> Allegiance {
        delegate!(self, c => c.allegiance())
    }

    pub fn attributes(&self) -> &Attributes {
        delegate!(self, c => c.attributes())
    }

    pub fn stats(&self) -> &StatSheet {
        delegate!(self, c => c.stats())
    }

    pub fn vitals(&self) -> &Vitals {
        delegate!(self, c => c.vitals())
    }

    pub fn conditions(&self) -> &Conditions {
        delegate!(self, c => c.conditions())
    }

    pub fn conditions_mut(&mut self) -> &mut Conditions {
        delegate!(self, c => c.conditions_mut())
    }

    /// Base movement speed scaled by active speed modifiers.
    pub fn movement_speed(&self) -> f32 {
        delegate!(self, c => c.base_move_speed() * c.conditions().speed_multiplier())
    }

    /// Derived damage reduction adjusted by active defense modifiers.
    pub fn damage_reduction(&self) -> f32 {
        let base = self.stats().get(crate::stats::StatKind::DamageReduction);
        self.conditions().effective_damage_reduction(base)
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Self::Character(c) => Some(c),
            Self::Creature(_) => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match self {
            Self::Character(c) => Some(c),
            Self::Creature(_) => None,
        }
    }

    pub fn as_creature(&self) -> Option<&Creature> {
        match self {
            Self::Creature(c) => Some(c),
            Self::Character(_) => None,
        }
    }

    /// Experience lost on this combatant's death, if it has died.
    pub fn death_penalty(&self) -> Option<u64> {
        match self {
            Self::Character(c) => c.death_penalty(),
            Self::Creature(c) => c.is_dead().then_some(0),
        }
    }
}

impl Damageable for Combatant {
    fn take_damage(&mut self, info: &DamageInfo) -> DamageOutcome {
        delegate!(self, c => c.take_damage(info))
    }

    fn heal(&mut self, amount: i32) -> i32 {
        delegate!(self, c => c.heal(amount))
    }

    fn is_dead(&self) -> bool {
        delegate!(self, c => c.is_dead())
    }
}

impl SpellCaster for Combatant {
    fn caster_id(&self) -> EntityId {
        self.id()
    }

    fn caster_attributes(&self) -> &Attributes {
        self.attributes()
    }

    fn is_stunned(&self) -> bool {
        self.conditions().is_stunned()
    }

    fn available_resource(&self) -> Option<i32> {
        delegate!(self, c => c.available_resource())
    }

    fn consume_resource(&mut self, amount: i32) -> bool {
        delegate!(self, c => c.consume_resource(amount))
    }
}

impl StatusEffectTarget for Combatant {
    fn attach_modifier(&mut self, id: EffectId, modifier: StatusModifier) {
        self.conditions_mut().attach(id, modifier);
    }

    fn detach_modifier(&mut self, id: EffectId) -> Option<StatusModifier> {
        self.conditions_mut().detach(id)
    }
}

impl From<Character> for Combatant {
    fn from(character: Character) -> Self {
        Self::Character(character)
    }
}

impl From<Creature> for Combatant {
    fn from(creature: Creature) -> Self {
        Self::Creature(creature)
    }
}
