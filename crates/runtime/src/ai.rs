//! Enemy attack loop.
//!
//! Each living creature counts its attack timer down every frame. When the
//! timer has run out and the nearest hostile combatant stands within the
//! creature's attack range, it casts one of its spells at that combatant's
//! position, chosen at random, and rearms the timer with its attack cooldown.
//! Out of range, the timer stays expired and the creature attacks as soon as
//! a target comes close. The spell choice is seeded, so replays match.

use std::collections::BTreeMap;

use combat_core::rng::{RollContext, compute_seed};
use combat_core::{
    CastError, CastTarget, CombatEngine, Combatant, Damageable, EntityId, LayerMask, PcgRng,
    RngOracle, SpellId,
};
use glam::Vec2;
use tracing::{debug, trace};

/// One attack attempt made by a creature.
#[derive(Clone, Debug, PartialEq)]
pub struct AiDecision {
    pub creature: EntityId,
    pub target: EntityId,
    pub spell: SpellId,
    pub outcome: Result<(), CastError>,
}

struct Plan {
    creature: EntityId,
    position: Vec2,
    hostile: LayerMask,
    attack_range: f32,
    attack_cooldown: f32,
    spells: Vec<SpellId>,
}

pub struct CreatureAi {
    timers: BTreeMap<EntityId, f32>,
    rng: Box<dyn RngOracle>,
    seed: u64,
    choices: u64,
}

impl CreatureAi {
    pub fn new(seed: u64) -> Self {
        Self {
            timers: BTreeMap::new(),
            rng: Box::new(PcgRng),
            seed,
            choices: 0,
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Seconds until `creature` may attack again; 0 when ready or unknown.
    pub fn attack_timer(&self, creature: EntityId) -> f32 {
        self.timers.get(&creature).copied().unwrap_or(0.0)
    }

    /// Runs one frame of the attack loop.
    pub fn update(&mut self, engine: &mut CombatEngine, delta: f32) -> Vec<AiDecision> {
        let plans: Vec<Plan> = engine
            .roster()
            .iter()
            .filter_map(|combatant| {
                let creature = combatant.as_creature()?;
                if creature.is_dead() {
                    return None;
                }
                Some(Plan {
                    creature: creature.id(),
                    position: creature.body().position,
                    hostile: creature.allegiance().hostile_layers(),
                    attack_range: creature.attack_range,
                    attack_cooldown: creature.attack_cooldown,
                    spells: creature.spells.clone(),
                })
            })
            .collect();

        self.timers
            .retain(|id, _| plans.iter().any(|plan| plan.creature == *id));

        let mut decisions = Vec::new();
        for plan in plans {
            let timer = self.timers.entry(plan.creature).or_insert(0.0);
            *timer = (*timer - delta).max(0.0);
            if *timer > 0.0 {
                continue;
            }

            let Some((target, position)) = nearest_hostile(engine, &plan) else {
                continue;
            };
            if plan.position.distance(position) > plan.attack_range {
                continue;
            }
            *timer = plan.attack_cooldown;
            if plan.spells.is_empty() {
                continue;
            }

            let seed = compute_seed(
                self.seed,
                self.choices,
                plan.creature.0,
                RollContext::SpellChoice,
            );
            self.choices += 1;
            let spell = plan.spells[self.rng.pick(seed, plan.spells.len())].clone();

            let outcome = engine
                .cast(plan.creature, spell.as_str(), CastTarget::Point(position))
                .map(|_| ());
            match &outcome {
                Ok(()) => trace!(
                    target: "runtime::ai",
                    creature = %plan.creature,
                    %target,
                    %spell,
                    "creature attacked"
                ),
                Err(reason) => debug!(
                    target: "runtime::ai",
                    creature = %plan.creature,
                    %spell,
                    %reason,
                    "creature attack rejected"
                ),
            }
            decisions.push(AiDecision {
                creature: plan.creature,
                target,
                spell,
                outcome,
            });
        }
        decisions
    }
}

impl std::fmt::Debug for CreatureAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatureAi")
            .field("timers", &self.timers)
            .field("seed", &self.seed)
            .field("choices", &self.choices)
            .finish_non_exhaustive()
    }
}

fn nearest_hostile(engine: &CombatEngine, plan: &Plan) -> Option<(EntityId, Vec2)> {
    engine
        .roster()
        .iter()
        .filter(|other| other.id() != plan.creature && !other.is_dead())
        .filter(|other| other.body().layer.intersects(plan.hostile))
        .map(|other: &Combatant| (other.id(), other.position()))
        .min_by(|(_, a), (_, b)| {
            plan.position
                .distance_squared(*a)
                .total_cmp(&plan.position.distance_squared(*b))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::spell::Scaling;
    use combat_core::{
        AttributeKind, Attributes, ClassCatalog, CombatConfig, Creature, SpellBook,
        SpellDefinition, SpellType,
    };

    fn claw() -> SpellDefinition {
        let mut spell = SpellDefinition::new("Claw", SpellType::Attack);
        spell.base_damage = 6;
        spell.range = 2.0;
        spell.can_crit = false;
        spell.primary_scaling = Scaling::new(AttributeKind::Offense, 0.0);
        spell.secondary_scaling = Scaling::new(AttributeKind::Expertise, 0.0);
        spell
    }

    fn arena(distance: f32) -> (CombatEngine, EntityId, EntityId) {
        let book: SpellBook = [claw()].into_iter().collect();
        let mut engine = CombatEngine::new(CombatConfig::default(), book);
        let classes = ClassCatalog::builtin();
        let hero = engine.spawn_character("Rook", classes.get("Brawler").unwrap(), Vec2::ZERO);
        let id = engine.roster().next_id();
        let mut ghoul = Creature::new(id, "Ghoul", 1, Attributes::new())
            .with_position(Vec2::new(distance, 0.0))
            .with_spells([SpellId::from("Claw")]);
        ghoul.attack_range = 1.5;
        ghoul.attack_cooldown = 2.0;
        engine.insert(ghoul);
        (engine, hero, id)
    }

    fn health(engine: &CombatEngine, id: EntityId) -> i32 {
        engine.combatant(id).unwrap().vitals().health()
    }

    #[test]
    fn attacks_then_waits_for_cooldown() {
        let (mut engine, hero, ghoul) = arena(1.0);
        let mut ai = CreatureAi::new(7);
        let start = health(&engine, hero);

        let first = ai.update(&mut engine, 0.5);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].creature, ghoul);
        assert_eq!(first[0].target, hero);
        assert_eq!(first[0].outcome, Ok(()));
        assert_eq!(health(&engine, hero), start - 6);
        assert_eq!(ai.attack_timer(ghoul), 2.0);

        // 1.5 s later the timer still runs.
        for _ in 0..3 {
            assert!(ai.update(&mut engine, 0.5).is_empty());
        }
        assert_eq!(ai.update(&mut engine, 0.5).len(), 1);
        assert_eq!(health(&engine, hero), start - 12);
    }

    #[test]
    fn out_of_range_keeps_the_timer_expired() {
        let (mut engine, hero, ghoul) = arena(4.0);
        let mut ai = CreatureAi::new(7);

        assert!(ai.update(&mut engine, 0.1).is_empty());
        assert_eq!(ai.attack_timer(ghoul), 0.0);

        engine
            .roster_mut()
            .get_mut(hero)
            .unwrap()
            .body_mut()
            .position = Vec2::new(3.0, 0.0);
        assert_eq!(ai.update(&mut engine, 0.1).len(), 1);
    }

    #[test]
    fn dead_creatures_are_forgotten() {
        let (mut engine, _hero, ghoul) = arena(1.0);
        let mut ai = CreatureAi::new(7);
        ai.update(&mut engine, 0.1);
        assert_eq!(ai.attack_timer(ghoul), 2.0);

        engine.remove(ghoul);
        assert!(ai.update(&mut engine, 0.1).is_empty());
        assert_eq!(ai.attack_timer(ghoul), 0.0);
    }

    #[test]
    fn spell_choice_is_reproducible() {
        let run = || {
            let (mut engine, _, _) = arena(1.0);
            let mut ai = CreatureAi::new(99);
            (0..20)
                .flat_map(|_| ai.update(&mut engine, 0.5))
                .map(|decision| decision.spell)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
