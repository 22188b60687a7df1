//! Spatial-query collaborator.
//!
//! Spell resolution never walks the world itself. It asks a [`SpatialQuery`]
//! for "everything on these layers inside this circle" or "the first thing on
//! these layers along this ray", the same two questions a physics engine
//! answers. [`crate::roster::Roster`] provides a brute-force implementation
//! that is exact and deterministic, which is all the simulation needs.

use bitflags::bitflags;
use glam::Vec2;

use crate::entity::Combatant;
use crate::ids::EntityId;

bitflags! {
    /// Collision layers used to filter spatial queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LayerMask: u8 {
        const PLAYER   = 1 << 0;
        const ALLY     = 1 << 1;
        const ENEMY    = 1 << 2;
        const OBSTACLE = 1 << 3;

        const FRIENDLY = Self::PLAYER.bits() | Self::ALLY.bits();
    }
}

/// Collision footprint of anything the spatial index knows about.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub position: Vec2,
    pub radius: f32,
    pub layer: LayerMask,
}

impl Body {
    pub const DEFAULT_RADIUS: f32 = 0.5;

    pub fn new(position: Vec2, layer: LayerMask) -> Self {
        Self {
            position,
            radius: Self::DEFAULT_RADIUS,
            layer,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    /// True when a circle of `radius` at `center` touches this body.
    #[inline]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.position.distance(center) <= self.radius + radius
    }

    /// Distance along a normalized ray to the first point of this body, or
    /// `None` if the ray misses or starts inside it.
    pub fn ray_entry(&self, origin: Vec2, direction: Vec2) -> Option<f32> {
        let to_center = self.position - origin;
        if to_center.length_squared() <= self.radius * self.radius {
            return None;
        }

        let along = to_center.dot(direction);
        if along < 0.0 {
            return None;
        }
        let closest_sq = to_center.length_squared() - along * along;
        let radius_sq = self.radius * self.radius;
        if closest_sq > radius_sq {
            return None;
        }
        Some(along - (radius_sq - closest_sq).sqrt())
    }
}

/// First body hit by a raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub point: Vec2,
    pub distance: f32,
}

/// Physics-style queries over live bodies.
///
/// Implementations must return entities already filtered by `mask`, skip
/// dead combatants, and iterate in a stable order so that `max_targets`
/// caps select the same entities on every run.
pub trait SpatialQuery {
    /// Every body on `mask` touching the circle.
    fn query_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId>;

    /// Nearest body on `mask` along the ray within `max_distance`.
    ///
    /// `direction` need not be normalized. Bodies containing `origin` are
    /// ignored, so a caster never hits itself.
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    /// Pushes `target` by `impulse`. Hosts without physics may ignore it.
    fn apply_impulse(&mut self, _target: EntityId, _impulse: Vec2) {}
}

/// What spell resolution and status ticking need from the world: spatial
/// queries plus access to combatants by id.
pub trait CombatWorld: SpatialQuery {
    fn combatant(&self, id: EntityId) -> Option<&Combatant>;

    fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant>;

    fn contains(&self, id: EntityId) -> bool {
        self.combatant(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_mask_covers_player_and_ally() {
        assert!(LayerMask::FRIENDLY.contains(LayerMask::PLAYER));
        assert!(LayerMask::FRIENDLY.contains(LayerMask::ALLY));
        assert!(!LayerMask::FRIENDLY.intersects(LayerMask::ENEMY));
    }

    #[test]
    fn ray_entry_hits_front_of_body() {
        let body = Body::new(Vec2::new(5.0, 0.0), LayerMask::ENEMY).with_radius(1.0);
        let distance = body.ray_entry(Vec2::ZERO, Vec2::X).unwrap();
        assert!((distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_entry_misses_behind_and_beside() {
        let body = Body::new(Vec2::new(5.0, 0.0), LayerMask::ENEMY).with_radius(1.0);
        assert_eq!(body.ray_entry(Vec2::ZERO, -Vec2::X), None);
        assert_eq!(body.ray_entry(Vec2::new(0.0, 3.0), Vec2::X), None);
    }

    #[test]
    fn ray_starting_inside_is_ignored() {
        let body = Body::new(Vec2::ZERO, LayerMask::PLAYER).with_radius(0.5);
        assert_eq!(body.ray_entry(Vec2::ZERO, Vec2::X), None);
    }

    #[test]
    fn circle_overlap_uses_both_radii() {
        let body = Body::new(Vec2::new(3.0, 0.0), LayerMask::ENEMY).with_radius(0.5);
        assert!(body.overlaps_circle(Vec2::ZERO, 2.5));
        assert!(!body.overlaps_circle(Vec2::ZERO, 2.4));
    }
}
