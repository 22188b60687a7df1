//! Derived combat stats.
//!
//! Formulas:
//! - PhysicalDamage = 10 + Offense × 1.5
//! - MagicalDamage = 5 + Offense × 1.2
//! - CriticalChance (%) = 5 + Expertise × 0.5
//! - CriticalDamage (%) = 150 + Expertise × 2
//! - AttackSpeed (%) = 100 + Expertise × 0.5
//! - DamageReduction (%) = min(75, Resilience × 0.5)
//! - MagicFind = Fortuity × 2
//!
//! Class bonuses are added afterwards, one flat delta per stat.

use std::collections::BTreeMap;

use strum::EnumCount;

use crate::attributes::{AttributeKind, Attributes};
use crate::config::CombatConfig;

/// Secondary stat kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    PhysicalDamage,
    MagicalDamage,
    /// Percent chance; informational, spell crit rolls read the attribute directly.
    CriticalChance,
    /// Percent multiplier; informational, see `SpellDefinition::critical_damage_multiplier`.
    CriticalDamage,
    AttackSpeed,
    DamageReduction,
    MagicFind,
}

impl StatKind {
    pub const ALL: [Self; Self::COUNT] = [
        Self::PhysicalDamage,
        Self::MagicalDamage,
        Self::CriticalChance,
        Self::CriticalDamage,
        Self::AttackSpeed,
        Self::DamageReduction,
        Self::MagicFind,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Flat per-stat deltas granted by a class.
pub type StatBonuses = BTreeMap<StatKind, f32>;

/// Derived stat values, one slot per [`StatKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    values: [f32; StatKind::COUNT],
}

impl DerivedStats {
    /// Computes base stats from attributes, then layers `bonuses` on top.
    pub fn compute(attributes: &Attributes, bonuses: Option<&StatBonuses>) -> Self {
        let mut stats = Self::compute_base(attributes);
        if let Some(bonuses) = bonuses {
            for (kind, delta) in bonuses {
                stats.add(*kind, *delta);
            }
        }
        stats
    }

    fn compute_base(attributes: &Attributes) -> Self {
        let attr = |kind| attributes.get(kind) as f32;
        let offense = attr(AttributeKind::Offense);
        let expertise = attr(AttributeKind::Expertise);

        let mut stats = Self::default();
        stats.set(StatKind::PhysicalDamage, 10.0 + offense * 1.5);
        stats.set(StatKind::MagicalDamage, 5.0 + offense * 1.2);
        stats.set(StatKind::CriticalChance, Self::critical_chance(attributes));
        stats.set(StatKind::CriticalDamage, 150.0 + expertise * 2.0);
        stats.set(StatKind::AttackSpeed, 100.0 + expertise * 0.5);
        stats.set(
            StatKind::DamageReduction,
            (attr(AttributeKind::Resilience) * 0.5).min(CombatConfig::MAX_DAMAGE_REDUCTION),
        );
        stats.set(StatKind::MagicFind, attr(AttributeKind::Fortuity) * 2.0);
        stats
    }

    /// Base critical chance in percent: `5 + Expertise × 0.5`.
    pub fn critical_chance(attributes: &Attributes) -> f32 {
        5.0 + attributes.get(AttributeKind::Expertise) as f32 * 0.5
    }

    #[inline]
    pub fn get(&self, kind: StatKind) -> f32 {
        self.values[kind.index()]
    }

    #[inline]
    pub fn set(&mut self, kind: StatKind, value: f32) {
        self.values[kind.index()] = value;
    }

    #[inline]
    pub fn add(&mut self, kind: StatKind, delta: f32) {
        self.values[kind.index()] += delta;
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f32)> + '_ {
        StatKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }
}
