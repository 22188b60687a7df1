//! Combatant roster and the reference spatial index.
//!
//! Queries are brute force over id-ordered maps. That keeps them exact and
//! deterministic: AoE caps always keep the lowest ids, and raycasts break
//! distance ties the same way on every run.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::entity::{Combatant, Damageable};
use crate::ids::EntityId;
use crate::spatial::{Body, CombatWorld, LayerMask, RayHit, SpatialQuery};

/// Static scenery that blocks projectiles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub id: EntityId,
    pub body: Body,
}

impl Obstacle {
    pub fn new(id: EntityId, position: Vec2, radius: f32) -> Self {
        Self {
            id,
            body: Body::new(position, LayerMask::OBSTACLE).with_radius(radius),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    combatants: BTreeMap<EntityId, Combatant>,
    obstacles: BTreeMap<EntityId, Obstacle>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest id not used by any combatant or obstacle.
    pub fn next_id(&self) -> EntityId {
        let highest = self
            .combatants
            .keys()
            .chain(self.obstacles.keys())
            .map(|id| id.0)
            .filter(|id| *id != EntityId::SYSTEM.0)
            .max();
        EntityId(highest.map_or(0, |id| id + 1))
    }

    /// Adds or replaces a combatant, keyed by its own id.
    pub fn insert(&mut self, combatant: impl Into<Combatant>) -> Option<Combatant> {
        let combatant = combatant.into();
        self.combatants.insert(combatant.id(), combatant)
    }

    pub fn insert_obstacle(&mut self, obstacle: Obstacle) -> Option<Obstacle> {
        self.obstacles.insert(obstacle.id, obstacle)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Combatant> {
        self.combatants.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.values_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.combatants.keys().copied().collect()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.values()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Living combatant bodies followed by obstacle bodies, in id order.
    fn bodies(&self) -> impl Iterator<Item = (EntityId, &Body)> {
        let living = self
            .combatants
            .values()
            .filter(|c| !c.is_dead())
            .map(|c| (c.id(), c.body()));
        let scenery = self.obstacles.values().map(|o| (o.id, &o.body));
        living.chain(scenery)
    }
}

impl SpatialQuery for Roster {
    fn query_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId> {
        self.bodies()
            .filter(|(_, body)| mask.intersects(body.layer) && body.overlaps_circle(center, radius))
            .map(|(id, _)| id)
            .collect()
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        self.bodies()
            .filter(|(_, body)| mask.intersects(body.layer))
            .filter_map(|(id, body)| {
                body.ray_entry(origin, direction)
                    .filter(|distance| *distance <= max_distance)
                    .map(|distance| RayHit {
                        entity: id,
                        point: origin + direction * distance,
                        distance,
                    })
            })
            // min_by keeps the first of equal elements, i.e. the lowest id.
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn apply_impulse(&mut self, target: EntityId, impulse: Vec2) {
        if let Some(combatant) = self.combatants.get_mut(&target) {
            combatant.body_mut().position += impulse;
        }
    }
}

impl CombatWorld for Roster {
    fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::combat::{DamageInfo, DamageType};
    use crate::entity::Creature;

    fn creature(id: u32, x: f32, y: f32) -> Creature {
        Creature::new(EntityId(id), "Ghoul", 1, Attributes::uniform(5)).with_position(Vec2::new(x, y))
    }

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.insert(creature(1, 2.0, 0.0));
        roster.insert(creature(2, 5.0, 0.0));
        roster.insert(creature(3, 0.0, 8.0));
        roster.insert_obstacle(Obstacle::new(EntityId(10), Vec2::new(3.5, 0.0), 0.25));
        roster
    }

    #[test]
    fn circle_query_filters_by_layer() {
        let roster = roster();
        let hits = roster.query_circle(Vec2::new(3.0, 0.0), 2.0, LayerMask::ENEMY);
        assert_eq!(hits, vec![EntityId(1), EntityId(2)]);

        let hits = roster.query_circle(Vec2::new(3.0, 0.0), 2.0, LayerMask::OBSTACLE);
        assert_eq!(hits, vec![EntityId(10)]);

        assert!(roster.query_circle(Vec2::ZERO, 50.0, LayerMask::PLAYER).is_empty());
    }

    #[test]
    fn raycast_returns_nearest_hit_in_range() {
        let roster = roster();

        let hit = roster
            .raycast(Vec2::ZERO, Vec2::new(10.0, 0.0), 10.0, LayerMask::ENEMY)
            .unwrap();
        assert_eq!(hit.entity, EntityId(1));
        assert!((hit.distance - 1.5).abs() < 1e-5);

        assert!(roster.raycast(Vec2::ZERO, Vec2::X, 1.0, LayerMask::ENEMY).is_none());
        assert!(roster.raycast(Vec2::ZERO, Vec2::ZERO, 10.0, LayerMask::ENEMY).is_none());
    }

    #[test]
    fn dead_combatants_are_invisible_to_queries() {
        let mut roster = roster();
        roster
            .get_mut(EntityId(1))
            .unwrap()
            .take_damage(&DamageInfo::new(EntityId::SYSTEM, 10_000, DamageType::True));

        let hit = roster.raycast(Vec2::ZERO, Vec2::X, 10.0, LayerMask::ENEMY).unwrap();
        assert_eq!(hit.entity, EntityId(2));
    }

    #[test]
    fn impulse_moves_combatant() {
        let mut roster = roster();
        roster.apply_impulse(EntityId(1), Vec2::new(1.0, 0.5));
        assert_eq!(roster.get(EntityId(1)).unwrap().position(), Vec2::new(3.0, 0.5));
    }

    #[test]
    fn next_id_skips_used_ids() {
        let roster = roster();
        assert_eq!(roster.next_id(), EntityId(11));
        assert_eq!(Roster::new().next_id(), EntityId(0));
    }
}
