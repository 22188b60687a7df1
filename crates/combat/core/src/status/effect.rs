//! Status effect kinds and active instances.

use crate::config::CombatConfig;
use crate::entity::StatusModifier;
use crate::ids::{EffectId, EntityId};
use crate::spell::{SpellDefinition, StatusEffectSpec};

use super::visuals::VisualHandle;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusEffectKind {
    /// Generic beneficial marker with no built-in behaviour.
    Buff,
    /// Generic harmful marker with no built-in behaviour.
    Debuff,
    /// Generic periodic marker; carries no payload of its own.
    OverTime,
    /// Crowd control; prevents casting while active.
    Control,
    DamageOverTime,
    HealOverTime,
    Stun,
    Slow,
    SpeedBuff,
    DefenseDebuff,
}

impl StatusEffectKind {
    /// Kinds that deliver a payload every tick interval.
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::DamageOverTime | Self::HealOverTime)
    }

    /// Base payload a spell contributes to an effect of this kind.
    pub fn spell_base_value(self, spell: &SpellDefinition) -> i32 {
        match self {
            Self::DamageOverTime => spell.base_damage,
            Self::HealOverTime => spell.base_healing,
            _ => 0,
        }
    }

    /// Reversible modifier attached on application, if the kind has one.
    pub fn modifier(self, potency: f32, defense_step: f32) -> Option<StatusModifier> {
        let speed_step = CombatConfig::SPEED_MODIFIER_PER_POTENCY * potency;
        match self {
            Self::SpeedBuff => Some(StatusModifier::Speed {
                multiplier: 1.0 + speed_step,
            }),
            Self::Slow => Some(StatusModifier::Speed {
                multiplier: (1.0 - speed_step).max(0.0),
            }),
            Self::DefenseDebuff => Some(StatusModifier::DamageReduction {
                delta: -defense_step * potency,
            }),
            Self::Stun | Self::Control => Some(StatusModifier::Stun),
            _ => None,
        }
    }
}

/// A status effect ready to be applied: the spell-level defaults are already
/// folded into the payload and tick interval.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusApplication {
    pub source: EntityId,
    pub spec: StatusEffectSpec,
    pub base_value: i32,
    pub tick_interval: f32,
}

impl StatusApplication {
    /// Resolves `spec` as applied by `spell`.
    ///
    /// The payload falls back to the spell's base damage (DoT) or base healing
    /// (HoT); the interval falls back to the spell's tick rate, then to
    /// `default_interval`.
    pub fn from_spell(
        source: EntityId,
        spell: &SpellDefinition,
        spec: &StatusEffectSpec,
        default_interval: f32,
    ) -> Self {
        let spell_interval = if spell.tick_rate > 0.0 {
            spell.tick_rate
        } else {
            default_interval
        };
        Self {
            source,
            spec: spec.clone(),
            base_value: spec
                .base_value
                .unwrap_or_else(|| spec.kind.spell_base_value(spell)),
            tick_interval: spec.tick_interval.filter(|t| *t > 0.0).unwrap_or(spell_interval),
        }
    }

    /// Applies `spec` directly, without a spell to draw defaults from.
    pub fn standalone(source: EntityId, spec: StatusEffectSpec, default_interval: f32) -> Self {
        Self {
            source,
            base_value: spec.base_value.unwrap_or(0),
            tick_interval: spec.tick_interval.filter(|t| *t > 0.0).unwrap_or(default_interval),
            spec,
        }
    }
}

/// What one `advance` call did to an effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectProgress {
    /// The tick interval elapsed; the periodic payload is due.
    pub fired: bool,
    /// Remaining duration reached zero.
    pub expired: bool,
}

/// One effect instance on one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatusEffect {
    pub id: EffectId,
    pub target: EntityId,
    /// Used only for attribution; never keeps the source alive.
    pub source: EntityId,
    pub name: String,
    pub kind: StatusEffectKind,
    pub remaining: f32,
    pub tick_interval: f32,
    pub since_last_tick: f32,
    pub potency: f32,
    pub base_value: i32,
    /// Visual key used to respawn the visual after a restore.
    pub visual_key: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub visual: Option<VisualHandle>,
}

impl ActiveStatusEffect {
    pub fn new(id: EffectId, target: EntityId, application: &StatusApplication) -> Self {
        let spec = &application.spec;
        Self {
            id,
            target,
            source: application.source,
            name: spec.name.clone(),
            kind: spec.kind,
            remaining: spec.duration,
            tick_interval: application.tick_interval,
            since_last_tick: 0.0,
            potency: spec.potency,
            base_value: application.base_value,
            visual_key: spec.visual.clone(),
            visual: None,
        }
    }

    /// Periodic payload: `round(base_value × potency)`, ties to even.
    pub fn payload(&self) -> i32 {
        (self.base_value as f32 * self.potency).round_ties_even() as i32
    }

    /// Advances the effect by `delta` seconds.
    ///
    /// Duration and the tick accumulator each move exactly once per call. When
    /// the accumulator reaches the interval it resets to zero, so at most one
    /// payload fires per call.
    pub fn advance(&mut self, delta: f32) -> EffectProgress {
        self.remaining -= delta;
        let mut fired = false;
        if self.tick_interval > 0.0 {
            self.since_last_tick += delta;
            if self.since_last_tick >= self.tick_interval {
                self.since_last_tick = 0.0;
                fired = true;
            }
        }
        EffectProgress {
            fired,
            expired: self.remaining <= 0.0,
        }
    }
}
