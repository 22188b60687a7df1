//! Stat derivation.
//!
//! Derived values are a pure function of attributes, level and class bonuses:
//!
//! ```text
//! Attributes + level ──► ResourceMaximums   (max health, max resource)
//! Attributes + bonuses ──► DerivedStats     (damage, crit, speed, DR, find)
//! ```
//!
//! Nothing here is persisted. Owners keep a [`StatSheet`] as a cache and
//! rebuild it whenever one of its inputs changes.

pub mod derived;
pub mod progression;
pub mod resources;

pub use derived::{DerivedStats, StatBonuses, StatKind};
pub use progression::{Progression, experience_for_level};
pub use resources::ResourceMaximums;

use crate::attributes::Attributes;

/// Everything derived from one combatant's attributes, level and class.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSheet {
    pub derived: DerivedStats,
    pub maximums: ResourceMaximums,
}

impl StatSheet {
    pub fn compute(attributes: &Attributes, level: u32, bonuses: Option<&StatBonuses>) -> Self {
        Self {
            derived: DerivedStats::compute(attributes, bonuses),
            maximums: ResourceMaximums::compute(attributes, level),
        }
    }

    #[inline]
    pub fn get(&self, kind: StatKind) -> f32 {
        self.derived.get(kind)
    }
}
