//! Spell resolution.
//!
//! [`SpellEngine::cast`] runs in two phases. Validation reads the world and
//! checks, in order:
//!
//! 1. the caster is not stunned
//! 2. the caster is not dead
//! 3. the (caster, spell) cooldown has run out
//! 4. the caster can pay the resource cost
//! 5. the aim is inside the spell's range (self-targeted spells skip this)
//!
//! Only when every check passes does execution begin: the cost is paid, the
//! cooldown starts, targets are resolved and payloads applied. A rejected cast
//! therefore leaves every entity, cooldown and effect exactly as it found
//! them.

use glam::Vec2;
use tracing::{debug, warn};

use crate::attributes::Attributes;
use crate::combat::{
    DamageInfo, HitReport, TargetQuery, apply_critical, calculate_damage, calculate_healing,
    deliver_damage, deliver_healing, resolve_targets, roll_critical,
};
use crate::config::CombatConfig;
use crate::cooldown::{CooldownKey, CooldownTracker};
use crate::entity::{Damageable, SpellCaster};
use crate::error::{ErrorSeverity, GameError};
use crate::events::{CombatEvent, EventSink};
use crate::ids::{EffectId, EntityId, SpellId};
use crate::projectile::{Impact, ImpactKind, ProjectileSystem};
use crate::rng::{PcgRng, RngOracle, RollContext, compute_seed};
use crate::spatial::CombatWorld;
use crate::spell::{SpellDefinition, TargetingMode};
use crate::status::{StatusApplication, StatusEffectManager};

// ============================================================================
// Errors
// ============================================================================

/// Why a cast was rejected. Gameplay rejections are routine and recoverable;
/// the rest indicate a bad request or bad content.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("caster {0} not found")]
    CasterNotFound(EntityId),

    #[error("unknown spell `{0}`")]
    UnknownSpell(SpellId),

    #[error("no spell equipped in slot {0}")]
    EmptySlot(usize),

    #[error("caster is stunned")]
    Stunned,

    #[error("caster is dead")]
    Dead,

    #[error("spell is on cooldown for {remaining:.2}s")]
    OnCooldown { remaining: f32 },

    #[error("needs {required} resource, has {available}")]
    InsufficientResource { required: i32, available: i32 },

    #[error("target is {distance:.2} away, range is {range:.2}")]
    OutOfRange { distance: f32, range: f32 },

    #[error("target {0} not found")]
    TargetNotFound(EntityId),

    #[error("cast direction is zero")]
    InvalidDirection,
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Stunned
            | Self::Dead
            | Self::OnCooldown { .. }
            | Self::InsufficientResource { .. }
            | Self::OutOfRange { .. } => ErrorSeverity::Recoverable,
            Self::CasterNotFound(_)
            | Self::UnknownSpell(_)
            | Self::EmptySlot(_)
            | Self::TargetNotFound(_)
            | Self::InvalidDirection => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CasterNotFound(_) => "CAST_CASTER_NOT_FOUND",
            Self::UnknownSpell(_) => "CAST_UNKNOWN_SPELL",
            Self::EmptySlot(_) => "CAST_EMPTY_SLOT",
            Self::Stunned => "CAST_STUNNED",
            Self::Dead => "CAST_DEAD",
            Self::OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Self::InsufficientResource { .. } => "CAST_INSUFFICIENT_RESOURCE",
            Self::OutOfRange { .. } => "CAST_OUT_OF_RANGE",
            Self::TargetNotFound(_) => "CAST_TARGET_NOT_FOUND",
            Self::InvalidDirection => "CAST_INVALID_DIRECTION",
        }
    }
}

// ============================================================================
// Inputs and outputs
// ============================================================================

/// Where a cast is aimed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastTarget {
    /// The caster's own position.
    Caster,
    /// A world point.
    Point(Vec2),
    /// A direction from the caster; the aim lands `range` away.
    Direction(Vec2),
    /// Another combatant's current position.
    Entity(EntityId),
}

impl CastTarget {
    fn aim<W>(&self, world: &W, origin: Vec2, range: f32) -> Result<Vec2, CastError>
    where
        W: CombatWorld + ?Sized,
    {
        match *self {
            Self::Caster => Ok(origin),
            Self::Point(point) => Ok(point),
            Self::Direction(direction) => direction
                .try_normalize()
                .map(|d| origin + d * range)
                .ok_or(CastError::InvalidDirection),
            Self::Entity(id) => world
                .combatant(id)
                .map(|c| c.position())
                .ok_or(CastError::TargetNotFound(id)),
        }
    }
}

/// Outcome of a successful cast.
#[derive(Clone, Debug, PartialEq)]
pub struct CastReport {
    pub caster: EntityId,
    pub spell: SpellId,
    pub target_point: Vec2,
    pub resource_spent: i32,
    pub cooldown: f32,
    /// Per-target results; empty for projectile launches and for casts that
    /// found nobody.
    pub hits: Vec<HitReport>,
    pub effects: Vec<EffectId>,
    pub projectile: Option<u64>,
}

/// Mutable services a cast touches, borrowed from whoever owns them.
pub struct CastContext<'a, W: CombatWorld + ?Sized> {
    pub world: &'a mut W,
    pub cooldowns: &'a mut CooldownTracker,
    pub statuses: &'a mut StatusEffectManager,
    pub projectiles: &'a mut ProjectileSystem,
    pub events: &'a mut dyn EventSink,
}

/// Everything execution needs, computed by validation.
struct CastPlan {
    key: CooldownKey,
    attributes: Attributes,
    query: TargetQuery,
}

// ============================================================================
// Engine
// ============================================================================

pub struct SpellEngine {
    rng: Box<dyn RngOracle>,
    seed: u64,
    /// Critical rolls made so far; mixed into each roll's seed.
    rolls: u64,
    min_damage: i32,
    default_tick_interval: f32,
}

impl SpellEngine {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            rng: Box::new(PcgRng),
            seed: config.rng_seed,
            rolls: 0,
            min_damage: config.min_damage,
            default_tick_interval: config.default_tick_interval,
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    pub(crate) fn set_rolls(&mut self, rolls: u64) {
        self.rolls = rolls;
    }

    /// Casts `spell` from `caster` at `target`.
    ///
    /// On `Err` nothing was mutated. On `Ok` the cost was paid and the
    /// cooldown started even if no target was found.
    pub fn cast<W>(
        &mut self,
        ctx: &mut CastContext<'_, W>,
        caster: EntityId,
        spell: &SpellDefinition,
        target: CastTarget,
    ) -> Result<CastReport, CastError>
    where
        W: CombatWorld + ?Sized,
    {
        let plan = match Self::validate(&*ctx.world, ctx.cooldowns, caster, spell, target) {
            Ok(plan) => plan,
            Err(error) => {
                debug!(
                    target: "combat::cast",
                    %caster,
                    spell = %spell.id,
                    %error,
                    "cast rejected"
                );
                return Err(error);
            }
        };

        let cost = spell.resource_cost.max(0);
        if let Some(combatant) = ctx.world.combatant_mut(caster) {
            let paid = combatant.consume_resource(cost);
            debug_assert!(paid, "resource was checked during validation");
        }
        ctx.cooldowns.set(plan.key, spell.cooldown);

        let mut report = CastReport {
            caster,
            spell: spell.id.clone(),
            target_point: plan.query.point,
            resource_spent: cost,
            cooldown: spell.cooldown,
            hits: Vec::new(),
            effects: Vec::new(),
            projectile: None,
        };

        if spell.projectile.is_some() && spell.targeting != TargetingMode::SelfOnly {
            let origin = plan.query.origin;
            let direction = plan.query.point - origin;
            report.projectile =
                ctx.projectiles
                    .launch(caster, spell, origin, direction, plan.query.layers);
            ctx.events.emit(CombatEvent::SpellCast {
                caster,
                spell: spell.id.clone(),
                target_point: plan.query.point,
                targets: Vec::new(),
            });
            ctx.events.emit(CombatEvent::ProjectileLaunched {
                caster,
                spell: spell.id.clone(),
                origin,
                direction: direction.normalize_or_zero(),
            });
            debug!(target: "combat::cast", %caster, spell = %spell.id, "projectile launched");
            return Ok(report);
        }

        let targets = resolve_targets(&*ctx.world, spell, &plan.query);
        ctx.events.emit(CombatEvent::SpellCast {
            caster,
            spell: spell.id.clone(),
            target_point: plan.query.point,
            targets: targets.clone(),
        });
        for target in targets {
            let hit = self.resolve_target(
                ctx,
                caster,
                &plan.attributes,
                spell,
                target,
                &mut report.effects,
            );
            report.hits.push(hit);
        }

        debug!(
            target: "combat::cast",
            %caster,
            spell = %spell.id,
            targets = report.hits.len(),
            "spell cast"
        );
        Ok(report)
    }

    /// Read-only precondition pass.
    fn validate<W>(
        world: &W,
        cooldowns: &CooldownTracker,
        caster_id: EntityId,
        spell: &SpellDefinition,
        target: CastTarget,
    ) -> Result<CastPlan, CastError>
    where
        W: CombatWorld + ?Sized,
    {
        let caster = world
            .combatant(caster_id)
            .ok_or(CastError::CasterNotFound(caster_id))?;

        if caster.is_stunned() {
            return Err(CastError::Stunned);
        }
        if caster.is_dead() {
            return Err(CastError::Dead);
        }

        let key = CooldownKey::new(caster_id, spell.id.clone());
        let remaining = cooldowns.remaining(&key);
        if remaining > 0.0 {
            return Err(CastError::OnCooldown { remaining });
        }

        if let Some(available) = caster.available_resource() {
            let required = spell.resource_cost.max(0);
            if available < required {
                return Err(CastError::InsufficientResource {
                    required,
                    available,
                });
            }
        }

        let origin = caster.position();
        let aim = target.aim(world, origin, spell.range)?;
        let allegiance = caster.allegiance();
        let layers =
            spell.resolve_layers(allegiance.hostile_layers(), allegiance.friendly_layers());
        let query = TargetQuery::new(spell, caster_id, origin, aim, layers)
            .ok_or(CastError::InvalidDirection)?;

        if spell.targeting == TargetingMode::Position {
            let distance = query.distance();
            if distance > spell.range {
                return Err(CastError::OutOfRange {
                    distance,
                    range: spell.range,
                });
            }
        }
        if spell.projectile.is_some()
            && spell.targeting != TargetingMode::SelfOnly
            && (query.point - origin).try_normalize().is_none()
        {
            return Err(CastError::InvalidDirection);
        }

        Ok(CastPlan {
            key,
            attributes: caster.attributes().clone(),
            query,
        })
    }

    /// Applies a projectile's payload where it landed.
    ///
    /// A direct hit receives the full payload; area spells then hit everything
    /// else on the projectile's layers around the impact point.
    pub fn resolve_impact<W>(
        &mut self,
        ctx: &mut CastContext<'_, W>,
        spell: &SpellDefinition,
        impact: &Impact,
    ) -> Vec<HitReport>
    where
        W: CombatWorld + ?Sized,
    {
        let projectile = &impact.projectile;
        let Some(attributes) = ctx
            .world
            .combatant(projectile.caster)
            .map(|c| c.attributes().clone())
        else {
            warn!(
                target: "combat::projectile",
                caster = %projectile.caster,
                "impact without caster, payload skipped"
            );
            return Vec::new();
        };

        ctx.events.emit(CombatEvent::ProjectileImpact {
            caster: projectile.caster,
            spell: projectile.spell.clone(),
            point: impact.point,
            hit: impact.hit(),
        });

        let mut hits = Vec::new();
        let mut effects = Vec::new();
        let direct = match impact.kind {
            ImpactKind::Target(id) => {
                let caster = projectile.caster;
                hits.push(self.resolve_target(ctx, caster, &attributes, spell, id, &mut effects));
                Some(id)
            }
            ImpactKind::Obstacle(_) | ImpactKind::Expired => None,
        };

        if let Some(area) = spell.area {
            let splash: Vec<EntityId> = ctx
                .world
                .query_circle(impact.point, area.radius, projectile.layers)
                .into_iter()
                .filter(|id| *id != projectile.caster && Some(*id) != direct)
                .take(area.limit())
                .collect();
            for id in splash {
                let caster = projectile.caster;
                hits.push(self.resolve_target(ctx, caster, &attributes, spell, id, &mut effects));
            }
        }
        hits
    }

    /// Damage, healing and status payload for one target.
    fn resolve_target<W>(
        &mut self,
        ctx: &mut CastContext<'_, W>,
        caster: EntityId,
        attributes: &Attributes,
        spell: &SpellDefinition,
        target: EntityId,
        effects: &mut Vec<EffectId>,
    ) -> HitReport
    where
        W: CombatWorld + ?Sized,
    {
        let mut hit = HitReport::new(target);

        if spell.deals_damage() && !spell.spell_type.is_supportive() {
            let mut amount = calculate_damage(spell, attributes, self.min_damage);
            let critical = spell.can_crit && {
                let seed = compute_seed(self.seed, self.rolls, target.0, RollContext::Critical);
                self.rolls += 1;
                roll_critical(spell, attributes, self.rng.roll_percent(seed))
            };
            if critical {
                amount = apply_critical(amount, spell.critical_damage_multiplier);
            }
            let info = DamageInfo::from_spell(caster, spell, amount, critical);
            if let Some(outcome) = deliver_damage(&mut *ctx.world, &mut *ctx.events, target, info) {
                hit.damage = outcome.dealt();
                hit.critical = critical;
                hit.killed = outcome.is_killing_blow();
            }
        }

        if spell.heals() && !spell.spell_type.is_offensive() {
            let amount = calculate_healing(spell, attributes, self.min_damage);
            hit.healed = deliver_healing(&mut *ctx.world, &mut *ctx.events, caster, target, amount)
                .unwrap_or(0);
        }

        for spec in &spell.status_effects {
            let application =
                StatusApplication::from_spell(caster, spell, spec, self.default_tick_interval);
            let applied =
                ctx.statuses
                    .apply(&mut *ctx.world, &mut *ctx.events, target, &application);
            effects.extend(applied);
        }

        hit
    }
}

impl std::fmt::Debug for SpellEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellEngine")
            .field("seed", &self.seed)
            .field("rolls", &self.rolls)
            .field("min_damage", &self.min_damage)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeKind;
    use crate::class::ClassCatalog;
    use crate::entity::{Character, CharacterRules, Creature};
    use crate::roster::Roster;
    use crate::spell::{AreaOfEffect, ProjectileProfile, Scaling, SpellType, StatusEffectSpec};
    use crate::status::StatusEffectKind;

    const HERO: EntityId = EntityId(1);
    const GHOUL: EntityId = EntityId(2);

    struct Fixture {
        world: Roster,
        cooldowns: CooldownTracker,
        statuses: StatusEffectManager,
        projectiles: ProjectileSystem,
        events: Vec<CombatEvent>,
        engine: SpellEngine,
    }

    impl Fixture {
        fn new() -> Self {
            let config = CombatConfig::default();
            let brawler = ClassCatalog::builtin().get("Brawler").cloned().unwrap();
            let mut world = Roster::new();
            world.insert(Character::new(HERO, "Hero", &brawler, CharacterRules::default()));
            world.insert(
                Creature::new(GHOUL, "Ghoul", 1, Attributes::new()).with_position(Vec2::new(1.0, 0.0)),
            );
            Self {
                world,
                cooldowns: CooldownTracker::new(),
                statuses: StatusEffectManager::new(&config),
                projectiles: ProjectileSystem::new(),
                events: Vec::new(),
                engine: SpellEngine::new(&config),
            }
        }

        fn cast(&mut self, caster: EntityId, spell: &SpellDefinition, target: CastTarget) -> Result<CastReport, CastError> {
            let mut ctx = CastContext {
                world: &mut self.world,
                cooldowns: &mut self.cooldowns,
                statuses: &mut self.statuses,
                projectiles: &mut self.projectiles,
                events: &mut self.events,
            };
            self.engine.cast(&mut ctx, caster, spell, target)
        }

        fn health(&self, id: EntityId) -> i32 {
            self.world.get(id).unwrap().vitals().health()
        }

        fn resource(&self, id: EntityId) -> i32 {
            self.world.get(id).unwrap().vitals().resource()
        }
    }

    fn heavy_punch() -> SpellDefinition {
        let mut spell = SpellDefinition::new("Heavy Punch", SpellType::Attack);
        spell.base_damage = 20;
        spell.primary_scaling = Scaling::new(AttributeKind::Offense, 1.0);
        spell.secondary_scaling = Scaling::new(AttributeKind::Expertise, 0.0);
        spell.can_crit = false;
        spell.resource_cost = 10;
        spell.cooldown = 3.0;
        spell.range = 2.0;
        spell
    }

    #[test]
    fn heavy_punch_end_to_end() {
        let mut fx = Fixture::new();
        let ghoul_health = fx.health(GHOUL);
        let hero_resource = fx.resource(HERO);

        let report = fx
            .cast(HERO, &heavy_punch(), CastTarget::Point(Vec2::new(1.0, 0.0)))
            .unwrap();

        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].damage, 27);
        assert_eq!(fx.health(GHOUL), ghoul_health - 27);
        assert_eq!(fx.resource(HERO), hero_resource - 10);
        assert_eq!(
            fx.cooldowns.remaining(&CooldownKey::new(HERO, "Heavy Punch")),
            3.0
        );
        assert!(matches!(fx.events[0], CombatEvent::SpellCast { .. }));
        assert!(matches!(
            fx.events[1],
            CombatEvent::DamageDealt { amount: 27, target: GHOUL, .. }
        ));
    }

    #[test]
    fn rejected_casts_mutate_nothing() {
        let mut fx = Fixture::new();
        let punch = heavy_punch();
        fx.cast(HERO, &punch, CastTarget::Entity(GHOUL)).unwrap();

        let world = fx.world.clone();
        let cooldowns = fx.cooldowns.clone();
        let events = fx.events.len();

        let err = fx.cast(HERO, &punch, CastTarget::Entity(GHOUL)).unwrap_err();
        assert!(matches!(err, CastError::OnCooldown { .. }));
        assert!(err.severity().is_recoverable());

        let mut far = heavy_punch();
        far.id = SpellId::from("Far Punch");
        let err = fx.cast(HERO, &far, CastTarget::Point(Vec2::new(9.0, 0.0))).unwrap_err();
        assert!(matches!(err, CastError::OutOfRange { .. }));

        let mut pricey = heavy_punch();
        pricey.id = SpellId::from("Pricey Punch");
        pricey.resource_cost = 10_000;
        let err = fx.cast(HERO, &pricey, CastTarget::Entity(GHOUL)).unwrap_err();
        assert_eq!(err.error_code(), "CAST_INSUFFICIENT_RESOURCE");

        assert_eq!(fx.world, world);
        assert_eq!(fx.cooldowns, cooldowns);
        assert_eq!(fx.events.len(), events);
    }

    #[test]
    fn preconditions_are_checked_in_order() {
        let mut fx = Fixture::new();
        let punch = heavy_punch();
        fx.cooldowns.set(CooldownKey::new(HERO, "Heavy Punch"), 5.0);
        fx.world.get_mut(HERO).unwrap().conditions_mut().stun(1.0);
        fx.world
            .get_mut(HERO)
            .unwrap()
            .take_damage(&DamageInfo::new(GHOUL, 10_000, crate::combat::DamageType::True));

        let target = CastTarget::Entity(GHOUL);
        assert_eq!(fx.cast(HERO, &punch, target), Err(CastError::Stunned));
        fx.world.get_mut(HERO).unwrap().conditions_mut().tick(1.0);
        assert_eq!(fx.cast(HERO, &punch, target), Err(CastError::Dead));
        assert_eq!(
            fx.cast(EntityId(99), &punch, target),
            Err(CastError::CasterNotFound(EntityId(99)))
        );
    }

    #[test]
    fn whiff_still_pays_cost_and_cooldown() {
        let mut fx = Fixture::new();
        let resource = fx.resource(HERO);
        let report = fx
            .cast(HERO, &heavy_punch(), CastTarget::Point(Vec2::new(0.0, 1.5)))
            .unwrap();
        assert!(report.hits.is_empty());
        assert_eq!(fx.resource(HERO), resource - 10);
        assert!(!fx.cooldowns.is_empty());
    }

    #[test]
    fn creatures_cast_without_a_pool() {
        let mut fx = Fixture::new();
        let mut claw = heavy_punch();
        claw.resource_cost = 500;
        let report = fx.cast(GHOUL, &claw, CastTarget::Entity(HERO)).unwrap();
        assert_eq!(report.hits[0].target, HERO);
        assert_eq!(report.resource_spent, 500);
    }

    #[test]
    fn guaranteed_critical_uses_direct_multiplier() {
        let mut fx = Fixture::new();
        let mut spell = heavy_punch();
        spell.can_crit = true;
        spell.critical_chance_bonus = 100.0;
        spell.critical_damage_multiplier = 2.0;

        let report = fx.cast(HERO, &spell, CastTarget::Entity(GHOUL)).unwrap();
        assert!(report.hits[0].critical);
        assert_eq!(report.hits[0].damage, 54);
        assert_eq!(fx.engine.rolls(), 1);
    }

    #[test]
    fn self_heal_and_area_heal() {
        let mut fx = Fixture::new();
        fx.world
            .get_mut(HERO)
            .unwrap()
            .take_damage(&DamageInfo::new(GHOUL, 40, crate::combat::DamageType::Physical));

        let mut mend = SpellDefinition::new("Mend", SpellType::Healing);
        mend.targeting = TargetingMode::SelfOnly;
        mend.base_healing = 10;
        mend.primary_scaling = Scaling::new(AttributeKind::Offense, 0.0);
        mend.secondary_scaling = Scaling::new(AttributeKind::Expertise, 0.0);

        let report = fx.cast(HERO, &mend, CastTarget::Point(Vec2::new(50.0, 50.0))).unwrap();
        assert_eq!(report.hits[0].target, HERO);
        assert_eq!(report.hits[0].healed, 10);

        let mut circle = mend.clone();
        circle.id = SpellId::from("Healing Circle");
        circle.targeting = TargetingMode::Position;
        circle.area = Some(AreaOfEffect {
            radius: 2.0,
            max_targets: 0,
        });
        let report = fx.cast(HERO, &circle, CastTarget::Caster).unwrap();
        let targets: Vec<_> = report.hits.iter().map(|h| h.target).collect();
        assert_eq!(targets, vec![HERO], "enemies are not on friendly layers");
    }

    #[test]
    fn status_payloads_reach_each_target() {
        let mut fx = Fixture::new();
        let mut spell = heavy_punch();
        spell.status_effects.push(StatusEffectSpec::new("Dazed", StatusEffectKind::Slow, 2.0));

        let report = fx.cast(HERO, &spell, CastTarget::Entity(GHOUL)).unwrap();
        assert_eq!(report.effects.len(), 1);
        assert!(fx.statuses.has(GHOUL, "Dazed"));
    }

    #[test]
    fn direction_spells_ignore_aim_distance() {
        let mut fx = Fixture::new();
        let mut jab = heavy_punch();
        jab.targeting = TargetingMode::Direction;

        let report = fx.cast(HERO, &jab, CastTarget::Direction(Vec2::new(0.1, 0.0))).unwrap();
        assert_eq!(report.target_point, Vec2::new(2.0, 0.0));
        assert_eq!(report.hits.len(), 1);

        let mut fx = Fixture::new();
        assert_eq!(
            fx.cast(HERO, &jab, CastTarget::Direction(Vec2::ZERO)),
            Err(CastError::InvalidDirection)
        );
    }

    #[test]
    fn projectile_spells_defer_their_payload() {
        let mut fx = Fixture::new();
        let mut shot = heavy_punch();
        shot.projectile = Some(ProjectileProfile::default());
        let health = fx.health(GHOUL);

        let report = fx.cast(HERO, &shot, CastTarget::Entity(GHOUL)).unwrap();
        assert!(report.projectile.is_some());
        assert!(report.hits.is_empty());
        assert_eq!(fx.health(GHOUL), health);
        assert_eq!(fx.projectiles.len(), 1);
        assert!(matches!(fx.events[1], CombatEvent::ProjectileLaunched { .. }));

        let impacts = fx.projectiles.tick(&fx.world, 0.05);
        assert_eq!(impacts.len(), 1);
        let mut ctx = CastContext {
            world: &mut fx.world,
            cooldowns: &mut fx.cooldowns,
            statuses: &mut fx.statuses,
            projectiles: &mut fx.projectiles,
            events: &mut fx.events,
        };
        let hits = fx.engine.resolve_impact(&mut ctx, &shot, &impacts[0]);
        assert_eq!(hits[0].damage, 27);
        assert_eq!(fx.health(GHOUL), health - 27);
    }
}
