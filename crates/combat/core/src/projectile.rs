//! Projectile flight and impact detection.
//!
//! A projectile spell pays its cost when cast and launches a [`Projectile`]
//! instead of resolving on the spot. Every tick each projectile advances
//! `speed × dt` and detonates on the first of:
//!
//! - travelling the spell's range (area payload only),
//! - overlapping a living body on its target layers other than its caster,
//! - overlapping an obstacle.
//!
//! This module only detects impacts; the spell engine resolves their payload.

use glam::Vec2;
use tracing::trace;

use crate::ids::{EntityId, SpellId};
use crate::spatial::{CombatWorld, LayerMask};
use crate::spell::{ProjectileProfile, SpellDefinition};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub id: u64,
    pub caster: EntityId,
    pub spell: SpellId,
    pub position: Vec2,
    /// Unit vector.
    pub direction: Vec2,
    pub profile: ProjectileProfile,
    pub range: f32,
    pub travelled: f32,
    pub layers: LayerMask,
}

impl Projectile {
    /// Moves one step. Returns true once the range is used up.
    fn advance(&mut self, delta: f32) -> bool {
        let step = self.profile.speed * delta;
        self.position += self.direction * step;
        self.travelled += step;
        self.travelled >= self.range
    }
}

/// How a projectile ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactKind {
    /// Struck a combatant on its target layers.
    Target(EntityId),
    /// Struck scenery.
    Obstacle(EntityId),
    /// Ran out of range in open space.
    Expired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Impact {
    pub projectile: Projectile,
    pub point: Vec2,
    pub kind: ImpactKind,
}

impl Impact {
    pub fn hit(&self) -> Option<EntityId> {
        match self.kind {
            ImpactKind::Target(id) | ImpactKind::Obstacle(id) => Some(id),
            ImpactKind::Expired => None,
        }
    }
}

/// Every projectile in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileSystem {
    active: Vec<Projectile>,
    last_id: u64,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches `spell`'s projectile from `origin`.
    ///
    /// Returns `None` when the spell has no projectile profile or `direction`
    /// is zero.
    pub fn launch(
        &mut self,
        caster: EntityId,
        spell: &SpellDefinition,
        origin: Vec2,
        direction: Vec2,
        layers: LayerMask,
    ) -> Option<u64> {
        let profile = spell.projectile?;
        let direction = direction.try_normalize()?;
        self.last_id += 1;
        self.active.push(Projectile {
            id: self.last_id,
            caster,
            spell: spell.id.clone(),
            position: origin,
            direction,
            profile,
            range: spell.range,
            travelled: 0.0,
            layers,
        });
        Some(self.last_id)
    }

    /// Advances every projectile and returns those that detonated, in launch
    /// order.
    pub fn tick<W>(&mut self, world: &W, delta: f32) -> Vec<Impact>
    where
        W: CombatWorld + ?Sized,
    {
        let mut impacts = Vec::new();
        let mut flying = Vec::with_capacity(self.active.len());

        for mut projectile in std::mem::take(&mut self.active) {
            if !world.contains(projectile.caster) {
                trace!(target: "combat::projectile", id = projectile.id, "caster gone, projectile dropped");
                continue;
            }

            let kind = if projectile.advance(delta) {
                Some(ImpactKind::Expired)
            } else {
                Self::collide(world, &projectile)
            };

            match kind {
                Some(kind) => {
                    trace!(
                        target: "combat::projectile",
                        id = projectile.id,
                        ?kind,
                        x = projectile.position.x,
                        y = projectile.position.y,
                        "projectile impact"
                    );
                    impacts.push(Impact {
                        point: projectile.position,
                        projectile,
                        kind,
                    });
                }
                None => flying.push(projectile),
            }
        }

        self.active = flying;
        impacts
    }

    fn collide<W>(world: &W, projectile: &Projectile) -> Option<ImpactKind>
    where
        W: CombatWorld + ?Sized,
    {
        world
            .query_circle(
                projectile.position,
                projectile.profile.hitbox_radius,
                projectile.layers | LayerMask::OBSTACLE,
            )
            .into_iter()
            .filter(|id| *id != projectile.caster)
            .find_map(|id| match world.combatant(id) {
                Some(combatant) if projectile.layers.intersects(combatant.body().layer) => {
                    Some(ImpactKind::Target(id))
                }
                Some(_) => None,
                None => Some(ImpactKind::Obstacle(id)),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn restore(&mut self, projectiles: Vec<Projectile>, last_id: u64) {
        let highest = projectiles.iter().map(|p| p.id).max().unwrap_or(0);
        self.active = projectiles;
        self.last_id = last_id.max(highest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::class::ClassCatalog;
    use crate::entity::{Character, CharacterRules, Creature};
    use crate::roster::{Obstacle, Roster};
    use crate::spell::SpellType;

    const CASTER: EntityId = EntityId(1);

    fn world() -> Roster {
        let mut roster = Roster::new();
        roster.insert(Creature::new(CASTER, "Archer", 1, Attributes::new()));
        roster
    }

    fn arrow(range: f32) -> SpellDefinition {
        let mut spell = SpellDefinition::new("Arrow", SpellType::Attack);
        spell.range = range;
        spell.projectile = Some(ProjectileProfile {
            speed: 10.0,
            hitbox_radius: 0.25,
        });
        spell
    }

    fn launch(system: &mut ProjectileSystem, range: f32) {
        system
            .launch(CASTER, &arrow(range), Vec2::ZERO, Vec2::X, LayerMask::PLAYER)
            .unwrap();
    }

    #[test]
    fn hits_first_target_on_layer() {
        let mut world = world();
        let brawler = ClassCatalog::builtin().get("Brawler").cloned().unwrap();
        world.insert(
            Character::new(EntityId(2), "Hero", &brawler, CharacterRules::default())
                .with_position(Vec2::new(3.0, 0.0)),
        );

        let mut system = ProjectileSystem::new();
        launch(&mut system, 10.0);

        assert!(system.tick(&world, 0.1).is_empty());
        assert!(system.tick(&world, 0.1).is_empty());
        let impacts = system.tick(&world, 0.1);
        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].kind, ImpactKind::Target(EntityId(2)));
        assert!(system.is_empty());
    }

    #[test]
    fn obstacles_stop_projectiles() {
        let mut world = world();
        world.insert_obstacle(Obstacle::new(EntityId(5), Vec2::new(2.0, 0.0), 0.5));
        let mut system = ProjectileSystem::new();
        launch(&mut system, 10.0);

        let impacts = system.tick(&world, 0.2);
        assert_eq!(impacts[0].kind, ImpactKind::Obstacle(EntityId(5)));
        assert_eq!(impacts[0].hit(), Some(EntityId(5)));
    }

    #[test]
    fn expires_at_range() {
        let world = world();
        let mut system = ProjectileSystem::new();
        launch(&mut system, 1.5);

        assert!(system.tick(&world, 0.1).is_empty());
        let impacts = system.tick(&world, 0.1);
        assert_eq!(impacts[0].kind, ImpactKind::Expired);
        assert_eq!(impacts[0].hit(), None);
    }

    #[test]
    fn launch_requires_profile_and_direction() {
        let mut system = ProjectileSystem::new();
        let instant = SpellDefinition::new("Jab", SpellType::Attack);
        assert!(system.launch(CASTER, &instant, Vec2::ZERO, Vec2::X, LayerMask::ENEMY).is_none());
        let id = system.launch(CASTER, &arrow(10.0), Vec2::ZERO, Vec2::ZERO, LayerMask::ENEMY);
        assert!(id.is_none());
        assert!(system.is_empty());
    }

    #[test]
    fn dropped_when_caster_leaves() {
        let mut world = world();
        let mut system = ProjectileSystem::new();
        launch(&mut system, 10.0);
        world.remove(CASTER);
        assert!(system.tick(&world, 0.1).is_empty());
        assert!(system.is_empty());
    }
}
