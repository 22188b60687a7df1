//! Transient combat conditions: stun timers and reversible status modifiers.
//!
//! Modifiers are keyed by the [`EffectId`] of the status effect that attached
//! them, so removing the effect removes exactly its own contribution no matter
//! how many others are stacked on the same target.

use std::collections::BTreeMap;

use crate::config::CombatConfig;
use crate::ids::EffectId;

/// A reversible change attached by a status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusModifier {
    /// Multiplies movement speed.
    Speed { multiplier: f32 },
    /// Adds to damage reduction (negative for defense debuffs).
    DamageReduction { delta: f32 },
    /// Prevents casting while attached.
    Stun,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditions {
    /// Seconds left on the hit-stun applied by damage payloads.
    stun_remaining: f32,
    modifiers: BTreeMap<EffectId, StatusModifier>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_remaining > 0.0
            || self
                .modifiers
                .values()
                .any(|m| matches!(m, StatusModifier::Stun))
    }

    pub fn stun_remaining(&self) -> f32 {
        self.stun_remaining
    }

    /// Starts a hit-stun, replacing any running one.
    pub fn stun(&mut self, seconds: f32) {
        if seconds > 0.0 {
            self.stun_remaining = seconds;
        }
    }

    /// Advances the hit-stun timer.
    pub fn tick(&mut self, delta: f32) {
        if self.stun_remaining > 0.0 {
            self.stun_remaining = (self.stun_remaining - delta).max(0.0);
        }
    }

    pub fn attach(&mut self, id: EffectId, modifier: StatusModifier) {
        self.modifiers.insert(id, modifier);
    }

    pub fn detach(&mut self, id: EffectId) -> Option<StatusModifier> {
        self.modifiers.remove(&id)
    }

    pub fn modifier(&self, id: EffectId) -> Option<StatusModifier> {
        self.modifiers.get(&id).copied()
    }

    /// Product of all speed modifiers, never negative.
    pub fn speed_multiplier(&self) -> f32 {
        self.modifiers
            .values()
            .filter_map(|m| match m {
                StatusModifier::Speed { multiplier } => Some(*multiplier),
                _ => None,
            })
            .product::<f32>()
            .max(0.0)
    }

    pub fn damage_reduction_delta(&self) -> f32 {
        self.modifiers
            .values()
            .filter_map(|m| match m {
                StatusModifier::DamageReduction { delta } => Some(*delta),
                _ => None,
            })
            .sum()
    }

    /// Effective damage reduction given the derived base value.
    pub fn effective_damage_reduction(&self, base: f32) -> f32 {
        (base + self.damage_reduction_delta()).clamp(0.0, CombatConfig::MAX_DAMAGE_REDUCTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_stun_counts_down() {
        let mut conditions = Conditions::new();
        conditions.stun(1.5);
        assert!(conditions.is_stunned());

        conditions.tick(1.0);
        assert!(conditions.is_stunned());
        conditions.tick(1.0);
        assert!(!conditions.is_stunned());
        assert_eq!(conditions.stun_remaining(), 0.0);
    }

    #[test]
    fn modifiers_stack_and_detach_independently() {
        let mut conditions = Conditions::new();
        conditions.attach(EffectId(1), StatusModifier::Speed { multiplier: 1.3 });
        conditions.attach(EffectId(2), StatusModifier::Speed { multiplier: 0.7 });
        assert!((conditions.speed_multiplier() - 0.91).abs() < 1e-5);

        conditions.detach(EffectId(1));
        assert!((conditions.speed_multiplier() - 0.7).abs() < 1e-5);

        conditions.detach(EffectId(2));
        assert_eq!(conditions.speed_multiplier(), 1.0);
    }

    #[test]
    fn stun_modifier_blocks_until_detached() {
        let mut conditions = Conditions::new();
        conditions.attach(EffectId(4), StatusModifier::Stun);
        conditions.tick(10.0);
        assert!(conditions.is_stunned());

        assert_eq!(conditions.detach(EffectId(4)), Some(StatusModifier::Stun));
        assert!(!conditions.is_stunned());
    }

    #[test]
    fn damage_reduction_is_clamped() {
        let mut conditions = Conditions::new();
        conditions.attach(EffectId(1), StatusModifier::DamageReduction { delta: -20.0 });
        assert_eq!(conditions.effective_damage_reduction(9.0), 0.0);
        assert_eq!(conditions.effective_damage_reduction(30.0), 10.0);
    }
}
