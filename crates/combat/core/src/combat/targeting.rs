//! Target resolution by targeting mode.

use glam::Vec2;

use crate::ids::EntityId;
use crate::spatial::{LayerMask, SpatialQuery};
use crate::spell::{SpellDefinition, TargetingMode};

/// Where a cast is aimed from and at, already checked for range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetQuery {
    pub caster: EntityId,
    pub origin: Vec2,
    /// Effective target point (for direction spells, `range` along the aim).
    pub point: Vec2,
    pub layers: LayerMask,
}

impl TargetQuery {
    /// Builds the query for `spell` aimed at `aim`.
    ///
    /// Direction spells are projected to `origin + normalize(aim - origin) × range`.
    /// Returns `None` when a direction spell is aimed at its own origin.
    pub fn new(
        spell: &SpellDefinition,
        caster: EntityId,
        origin: Vec2,
        aim: Vec2,
        layers: LayerMask,
    ) -> Option<Self> {
        let point = match spell.targeting {
            TargetingMode::SelfOnly => origin,
            TargetingMode::Position => aim,
            TargetingMode::Direction => origin + (aim - origin).try_normalize()? * spell.range,
        };
        Some(Self {
            caster,
            origin,
            point,
            layers,
        })
    }

    pub fn distance(&self) -> f32 {
        self.origin.distance(self.point)
    }
}

/// Entities a spell affects.
///
/// - Self: the caster.
/// - AoE: every body on `layers` touching the area around the point, capped
///   at `max_targets` in the world's iteration order.
/// - Single target: the first body on `layers` along origin → point, up to
///   the spell's range.
///
/// An empty result is not an error; the cast still counts.
pub fn resolve_targets<W>(world: &W, spell: &SpellDefinition, query: &TargetQuery) -> Vec<EntityId>
where
    W: SpatialQuery + ?Sized,
{
    if spell.targeting == TargetingMode::SelfOnly {
        return vec![query.caster];
    }

    match spell.area {
        Some(area) => world
            .query_circle(query.point, area.radius, query.layers)
            .into_iter()
            .take(area.limit())
            .collect(),
        None => world
            .raycast(query.origin, query.point - query.origin, spell.range, query.layers)
            .map(|hit| hit.entity)
            .into_iter()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::entity::Creature;
    use crate::roster::Roster;
    use crate::spell::{AreaOfEffect, SpellType};

    fn roster() -> Roster {
        let mut roster = Roster::new();
        for (id, x) in [(1, 2.0), (2, 3.0), (3, 4.0), (4, 9.0)] {
            roster.insert(
                Creature::new(EntityId(id), "Ghoul", 1, Attributes::new()).with_position(Vec2::new(x, 0.0)),
            );
        }
        roster
    }

    fn query(spell: &SpellDefinition, aim: Vec2) -> TargetQuery {
        TargetQuery::new(spell, EntityId(0), Vec2::ZERO, aim, LayerMask::ENEMY).unwrap()
    }

    #[test]
    fn self_targeting_returns_caster() {
        let mut spell = SpellDefinition::new("Guard", SpellType::Buff);
        spell.targeting = TargetingMode::SelfOnly;
        let q = query(&spell, Vec2::new(100.0, 0.0));
        assert_eq!(q.point, Vec2::ZERO);
        assert_eq!(resolve_targets(&roster(), &spell, &q), vec![EntityId(0)]);
    }

    #[test]
    fn single_target_takes_first_hit() {
        let spell = SpellDefinition::new("Jab", SpellType::Attack);
        let targets = resolve_targets(&roster(), &spell, &query(&spell, Vec2::new(4.0, 0.0)));
        assert_eq!(targets, vec![EntityId(1)]);
    }

    #[test]
    fn single_target_respects_range() {
        let mut spell = SpellDefinition::new("Jab", SpellType::Attack);
        spell.range = 1.0;
        let targets = resolve_targets(&roster(), &spell, &query(&spell, Vec2::new(1.0, 0.0)));
        assert!(targets.is_empty());
    }

    #[test]
    fn aoe_caps_targets_consistently() {
        let mut spell = SpellDefinition::new("Nova", SpellType::Attack);
        spell.area = Some(AreaOfEffect {
            radius: 1.6,
            max_targets: 2,
        });
        let q = query(&spell, Vec2::new(3.0, 0.0));
        let first = resolve_targets(&roster(), &spell, &q);
        assert_eq!(first, vec![EntityId(1), EntityId(2)]);
        assert_eq!(resolve_targets(&roster(), &spell, &q), first);

        spell.area = Some(AreaOfEffect {
            radius: 1.6,
            max_targets: 0,
        });
        assert_eq!(resolve_targets(&roster(), &spell, &q).len(), 3);
    }

    #[test]
    fn direction_projects_to_range() {
        let mut spell = SpellDefinition::new("Shot", SpellType::Attack);
        spell.targeting = TargetingMode::Direction;
        spell.range = 6.0;
        let q = query(&spell, Vec2::new(0.5, 0.0));
        assert_eq!(q.point, Vec2::new(6.0, 0.0));
        assert!((q.distance() - 6.0).abs() < 1e-5);

        assert!(TargetQuery::new(&spell, EntityId(0), Vec2::ZERO, Vec2::ZERO, LayerMask::ENEMY).is_none());
    }
}
