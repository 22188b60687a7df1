//! Spell definition records.

use crate::attributes::{AttributeKind, Attributes};
use crate::combat::DamageType;
use crate::ids::SpellId;
use crate::spatial::LayerMask;
use crate::status::StatusEffectKind;

/// Broad intent of a spell. Decides which side it targets by default.
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
pub enum SpellType {
    #[default]
    Attack,
    Healing,
    Buff,
    Debuff,
    Utility,
    Summoning,
}

impl SpellType {
    /// True for spells aimed at the caster's enemies.
    pub const fn is_offensive(self) -> bool {
        matches!(self, Self::Attack | Self::Debuff)
    }

    /// True for spells aimed at the caster's side.
    pub const fn is_supportive(self) -> bool {
        matches!(self, Self::Healing | Self::Buff)
    }
}

// ============================================================================
// Targeting
// ============================================================================

/// How the cast's target point is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetingMode {
    /// The caster is the only target; range is not checked.
    SelfOnly,

    /// A point in the world within range.
    #[default]
    Position,

    /// A direction from the caster; the effective point is `range` away.
    Direction,
}

/// Area-of-effect shape around the resolved point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaOfEffect {
    pub radius: f32,
    /// Maximum affected entities; 0 means unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_targets: u32,
}

impl AreaOfEffect {
    pub const DEFAULT_RADIUS: f32 = 5.0;

    /// Returns the cap as an iterator bound.
    pub fn limit(&self) -> usize {
        if self.max_targets == 0 {
            usize::MAX
        } else {
            self.max_targets as usize
        }
    }
}

/// Channel timing. Recorded for hosts that animate channels; resolution is
/// instantaneous.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelProfile {
    pub max_time: f32,
    pub interruptible: bool,
}

/// Launch parameters for spells that travel before they land.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileProfile {
    /// Units per second.
    pub speed: f32,
    /// Radius used for impact overlap tests.
    pub hitbox_radius: f32,
}

impl Default for ProjectileProfile {
    fn default() -> Self {
        Self {
            speed: 15.0,
            hitbox_radius: 0.25,
        }
    }
}

// ============================================================================
// Scaling
// ============================================================================

/// One attribute-scaling term: `attribute × factor`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaling {
    pub attribute: AttributeKind,
    pub factor: f32,
}

impl Scaling {
    pub const fn new(attribute: AttributeKind, factor: f32) -> Self {
        Self { attribute, factor }
    }

    pub fn contribution(&self, attributes: &Attributes) -> f32 {
        attributes.get(self.attribute) as f32 * self.factor
    }
}

// ============================================================================
// Status effect payload
// ============================================================================

/// A status effect a spell applies to each target it resolves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectSpec {
    /// Deduplication key: one active instance per name per target.
    pub name: String,
    pub kind: StatusEffectKind,
    pub duration: f32,
    #[cfg_attr(feature = "serde", serde(default = "StatusEffectSpec::default_potency"))]
    pub potency: f32,
    /// Seconds between periodic payloads; falls back to the spell's tick rate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_interval: Option<f32>,
    /// Periodic payload; falls back to the spell's base damage or healing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_value: Option<i32>,
    /// Visual prefab key handed to the effect-visuals collaborator.
    #[cfg_attr(feature = "serde", serde(default))]
    pub visual: Option<String>,
}

impl StatusEffectSpec {
    pub fn new(name: impl Into<String>, kind: StatusEffectKind, duration: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            duration,
            potency: Self::default_potency(),
            tick_interval: None,
            base_value: None,
            visual: None,
        }
    }

    const fn default_potency() -> f32 {
        1.0
    }
}

// ============================================================================
// Spell definition
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellDefinition {
    pub id: SpellId,
    pub description: String,
    pub spell_type: SpellType,
    pub damage_type: DamageType,
    pub tags: Vec<String>,

    // Requirements
    pub level_requirement: u32,
    pub class_requirement: Option<String>,
    pub resource_cost: i32,

    // Timing
    /// Seconds of wind-up. Kept as data; the cast resolves immediately.
    pub cast_time: f32,
    pub cooldown: f32,
    pub channel: Option<ChannelProfile>,

    // Targeting
    pub targeting: TargetingMode,
    pub range: f32,
    pub area: Option<AreaOfEffect>,
    /// Overrides the side derived from `spell_type`.
    pub target_layers: Option<LayerMask>,

    // Payload
    pub base_damage: i32,
    pub base_healing: i32,
    /// Periodic interval for status effects this spell applies; 0 uses the
    /// configured default.
    pub tick_rate: f32,
    pub primary_scaling: Scaling,
    pub secondary_scaling: Scaling,
    pub knockback_force: f32,
    pub stun_duration: f32,
    pub status_effects: Vec<StatusEffectSpec>,

    // Criticals
    pub can_crit: bool,
    /// Added to the caster's critical chance, in percent.
    pub critical_chance_bonus: f32,
    /// Direct damage multiplier on a critical hit.
    pub critical_damage_multiplier: f32,

    pub projectile: Option<ProjectileProfile>,
    /// Visual key for the cast/impact effect.
    pub visual: Option<String>,
}

impl SpellDefinition {
    pub const DEFAULT_RANGE: f32 = 10.0;
    pub const DEFAULT_CRITICAL_MULTIPLIER: f32 = 1.5;

    pub fn new(name: impl Into<String>, spell_type: SpellType) -> Self {
        Self {
            id: SpellId::new(name),
            spell_type,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn is_aoe(&self) -> bool {
        self.area.is_some()
    }

    pub fn deals_damage(&self) -> bool {
        self.base_damage > 0
    }

    pub fn heals(&self) -> bool {
        self.base_healing > 0
    }

    /// Layers the spell resolves against, given the caster's own side.
    pub fn resolve_layers(&self, hostile: LayerMask, friendly: LayerMask) -> LayerMask {
        if let Some(layers) = self.target_layers {
            return layers;
        }
        if self.spell_type.is_supportive() {
            friendly
        } else if self.spell_type.is_offensive() {
            hostile
        } else {
            hostile | friendly
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Default for SpellDefinition {
    fn default() -> Self {
        Self {
            id: SpellId::new(""),
            description: String::new(),
            spell_type: SpellType::default(),
            damage_type: DamageType::default(),
            tags: Vec::new(),
            level_requirement: 1,
            class_requirement: None,
            resource_cost: 0,
            cast_time: 0.0,
            cooldown: 0.0,
            channel: None,
            targeting: TargetingMode::default(),
            range: Self::DEFAULT_RANGE,
            area: None,
            target_layers: None,
            base_damage: 0,
            base_healing: 0,
            tick_rate: 0.0,
            primary_scaling: Scaling::new(AttributeKind::Offense, 0.1),
            secondary_scaling: Scaling::new(AttributeKind::Expertise, 0.05),
            knockback_force: 0.0,
            stun_duration: 0.0,
            status_effects: Vec::new(),
            can_crit: true,
            critical_chance_bonus: 0.0,
            critical_damage_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
            projectile: None,
            visual: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_follow_spell_intent() {
        let hostile = LayerMask::ENEMY;
        let friendly = LayerMask::FRIENDLY;

        let attack = SpellDefinition::new("Bolt", SpellType::Attack);
        assert_eq!(attack.resolve_layers(hostile, friendly), hostile);

        let heal = SpellDefinition::new("Mend", SpellType::Healing);
        assert_eq!(heal.resolve_layers(hostile, friendly), friendly);

        let utility = SpellDefinition::new("Flare", SpellType::Utility);
        assert_eq!(utility.resolve_layers(hostile, friendly), hostile | friendly);

        let mut forced = SpellDefinition::new("Backfire", SpellType::Attack);
        forced.target_layers = Some(LayerMask::PLAYER);
        assert_eq!(forced.resolve_layers(hostile, friendly), LayerMask::PLAYER);
    }

    #[test]
    fn aoe_limit_zero_means_unlimited() {
        let unlimited = AreaOfEffect {
            radius: 3.0,
            max_targets: 0,
        };
        let capped = AreaOfEffect {
            radius: 3.0,
            max_targets: 2,
        };
        assert_eq!(unlimited.limit(), usize::MAX);
        assert_eq!(capped.limit(), 2);
    }

    #[test]
    fn scaling_contribution() {
        let mut attributes = Attributes::new();
        attributes.set(AttributeKind::Offense, 10);
        let scaling = Scaling::new(AttributeKind::Offense, 0.1);
        assert!((scaling.contribution(&attributes) - 1.0).abs() < 1e-6);
    }
}
