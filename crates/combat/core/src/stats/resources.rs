//! Resource pool maximums.
//!
//! Formulas:
//! - MaxHealth = 100 + Level × 10 + Resilience × 5
//! - MaxResource = 50 + Level × 5 + Tenacity × 3

use crate::attributes::{AttributeKind, Attributes};

/// Maximum pool sizes computed from attributes and level.
///
/// Never stored on its own; the current values live in [`crate::vitals::Vitals`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMaximums {
    pub health: i32,
    pub resource: i32,
}

impl ResourceMaximums {
    pub fn compute(attributes: &Attributes, level: u32) -> Self {
        Self {
            health: Self::compute_health(attributes, level),
            resource: Self::compute_resource(attributes, level),
        }
    }

    /// Formula: 100 + Level × 10 + Resilience × 5
    pub fn compute_health(attributes: &Attributes, level: u32) -> i32 {
        100 + level as i32 * 10 + attributes.get(AttributeKind::Resilience) * 5
    }

    /// Formula: 50 + Level × 5 + Tenacity × 3
    pub fn compute_resource(attributes: &Attributes, level: u32) -> i32 {
        50 + level as i32 * 5 + attributes.get(AttributeKind::Tenacity) * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_brawler_pools() {
        let mut attributes = Attributes::uniform(5);
        attributes.set(AttributeKind::Resilience, 8);

        let maximums = ResourceMaximums::compute(&attributes, 1);
        assert_eq!(maximums.health, 100 + 10 + 40);
        assert_eq!(maximums.resource, 50 + 5 + 15);
    }

    #[test]
    fn pools_grow_with_level() {
        let attributes = Attributes::uniform(5);
        let low = ResourceMaximums::compute(&attributes, 1);
        let high = ResourceMaximums::compute(&attributes, 10);

        assert_eq!(high.health - low.health, 90);
        assert_eq!(high.resource - low.resource, 45);
    }
}
