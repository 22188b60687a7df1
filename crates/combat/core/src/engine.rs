//! The simulation service bundle.
//!
//! [`CombatEngine`] owns the roster and every combat manager. Hosts construct
//! it explicitly, call [`CombatEngine::cast`] between frames and advance it
//! once per frame with [`CombatEngine::tick`]. Events emitted during either
//! call are buffered until [`CombatEngine::drain_events`].

use glam::Vec2;
use tracing::{debug, warn};

use crate::attributes::{AttributeChange, AttributeKind, Attributes};
use crate::cast::{CastContext, CastError, CastReport, CastTarget, SpellEngine};
use crate::class::ClassDefinition;
use crate::config::CombatConfig;
use crate::cooldown::{CooldownKey, CooldownTracker};
use crate::entity::{Character, CharacterRules, Combatant, Creature};
use crate::events::{CombatEvent, EventQueue, EventSink};
use crate::ids::{EffectId, EntityId};
use crate::projectile::ProjectileSystem;
use crate::rng::RngOracle;
use crate::roster::{Obstacle, Roster};
use crate::snapshot::{CharacterRecord, CreatureRecord, EngineSnapshot};
use crate::spell::{SpellBook, StatusEffectSpec};
use crate::status::{EffectVisuals, StatusApplication, StatusEffectManager};

#[derive(Debug)]
pub struct CombatEngine {
    config: CombatConfig,
    roster: Roster,
    spells: SpellBook,
    cooldowns: CooldownTracker,
    statuses: StatusEffectManager,
    projectiles: ProjectileSystem,
    spell_engine: SpellEngine,
    events: EventQueue,
}

impl CombatEngine {
    pub fn new(config: CombatConfig, spells: SpellBook) -> Self {
        Self {
            statuses: StatusEffectManager::new(&config),
            spell_engine: SpellEngine::new(&config),
            config,
            roster: Roster::new(),
            spells,
            cooldowns: CooldownTracker::new(),
            projectiles: ProjectileSystem::new(),
            events: EventQueue::new(),
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.spell_engine = self.spell_engine.with_rng(rng);
        self
    }

    #[must_use]
    pub fn with_visuals(mut self, visuals: impl EffectVisuals + 'static) -> Self {
        self.statuses.set_visuals(Box::new(visuals));
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.roster.get(id)
    }

    pub fn spells(&self) -> &SpellBook {
        &self.spells
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    pub fn statuses(&self) -> &StatusEffectManager {
        &self.statuses
    }

    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    /// Events emitted since the last drain, oldest first.
    pub fn pending_events(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    // ------------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------------

    /// Creates a level-1 character of `class` under the engine's rules.
    pub fn spawn_character(
        &mut self,
        name: impl Into<String>,
        class: &ClassDefinition,
        position: Vec2,
    ) -> EntityId {
        let id = self.roster.next_id();
        let rules = CharacterRules::from(&self.config);
        self.roster
            .insert(Character::new(id, name, class, rules).with_position(position));
        id
    }

    pub fn spawn_creature(
        &mut self,
        name: impl Into<String>,
        level: u32,
        attributes: Attributes,
        position: Vec2,
    ) -> EntityId {
        let id = self.roster.next_id();
        self.roster
            .insert(Creature::new(id, name, level, attributes).with_position(position));
        id
    }

    /// Adds a prepared combatant, replacing any with the same id.
    pub fn insert(&mut self, combatant: impl Into<Combatant>) -> EntityId {
        let combatant = combatant.into();
        let id = combatant.id();
        if self.roster.insert(combatant).is_some() {
            warn!(target: "combat::engine", %id, "combatant replaced");
        }
        id
    }

    pub fn add_obstacle(&mut self, position: Vec2, radius: f32) -> EntityId {
        let id = self.roster.next_id();
        self.roster.insert_obstacle(Obstacle::new(id, position, radius));
        id
    }

    /// Removes a combatant. Its status effects are dropped on the next tick.
    pub fn remove(&mut self, id: EntityId) -> Option<Combatant> {
        self.roster.remove(id)
    }

    // ------------------------------------------------------------------------
    // Casting
    // ------------------------------------------------------------------------

    /// Casts the spell named `spell` from the book.
    pub fn cast(
        &mut self,
        caster: EntityId,
        spell: &str,
        target: CastTarget,
    ) -> Result<CastReport, CastError> {
        let definition = self
            .spells
            .get(spell)
            .ok_or_else(|| CastError::UnknownSpell(spell.into()))?;
        let mut ctx = CastContext {
            world: &mut self.roster,
            cooldowns: &mut self.cooldowns,
            statuses: &mut self.statuses,
            projectiles: &mut self.projectiles,
            events: &mut self.events,
        };
        self.spell_engine.cast(&mut ctx, caster, definition, target)
    }

    /// Casts the spell a character has equipped in `slot`.
    pub fn cast_slot(
        &mut self,
        caster: EntityId,
        slot: usize,
        target: CastTarget,
    ) -> Result<CastReport, CastError> {
        let combatant = self
            .roster
            .get(caster)
            .ok_or(CastError::CasterNotFound(caster))?;
        let spell = combatant
            .as_character()
            .and_then(|character| character.equipped(slot))
            .ok_or(CastError::EmptySlot(slot))?
            .clone();
        self.cast(caster, spell.as_str(), target)
    }

    // ------------------------------------------------------------------------
    // Status effects and cooldowns
    // ------------------------------------------------------------------------

    /// Applies an effect that did not come from a spell (traps, items, scripts).
    pub fn apply_status(
        &mut self,
        source: EntityId,
        target: EntityId,
        spec: StatusEffectSpec,
    ) -> Option<EffectId> {
        let application =
            StatusApplication::standalone(source, spec, self.config.default_tick_interval);
        self.statuses
            .apply(&mut self.roster, &mut self.events, target, &application)
    }

    pub fn remove_status(&mut self, target: EntityId, effect: EffectId) -> bool {
        self.statuses
            .remove(&mut self.roster, &mut self.events, target, effect)
    }

    pub fn has_status(&self, target: EntityId, name: &str) -> bool {
        self.statuses.has(target, name)
    }

    pub fn cooldown_remaining(&self, caster: EntityId, spell: &str) -> f32 {
        self.cooldowns.remaining(&CooldownKey::new(caster, spell))
    }

    pub fn reset_cooldown(&mut self, caster: EntityId, spell: &str) -> bool {
        self.cooldowns.reset(&CooldownKey::new(caster, spell))
    }

    pub fn reset_cooldowns(&mut self, caster: EntityId) -> usize {
        self.cooldowns.reset_caster(caster)
    }

    // ------------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------------

    /// Grants experience to a character. Returns the levels gained.
    ///
    /// Non-characters and characters at the level cap gain nothing.
    pub fn grant_experience(&mut self, id: EntityId, amount: u64) -> u32 {
        let Some(character) = self
            .roster
            .get_mut(id)
            .and_then(Combatant::as_character_mut)
        else {
            warn!(target: "combat::engine", %id, "experience granted to a non-character");
            return 0;
        };
        if character.at_level_cap() {
            debug!(target: "combat::engine", %id, amount, "experience ignored at level cap");
            return 0;
        }

        let gained = character.gain_experience(amount);
        let level = character.level();
        self.events.emit(CombatEvent::ExperienceGained { entity: id, amount });
        if gained > 0 {
            self.events.emit(CombatEvent::LevelUp { entity: id, level });
        }
        gained
    }

    /// Writes a character attribute, recomputing its stats on change.
    pub fn set_attribute(
        &mut self,
        id: EntityId,
        kind: AttributeKind,
        value: i32,
    ) -> Option<AttributeChange> {
        let character = self
            .roster
            .get_mut(id)
            .and_then(Combatant::as_character_mut)?;
        let change = character.set_attribute(kind, value)?;
        self.events
            .emit(CombatEvent::AttributeChanged { entity: id, change });
        Some(change)
    }

    // ------------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------------

    /// Advances the simulation by `delta` seconds.
    ///
    /// Order: cooldowns, hit-stun timers, status effects, then projectiles
    /// (whose impacts resolve immediately). Non-positive deltas are ignored.
    pub fn tick(&mut self, delta: f32) {
        if delta <= 0.0 || !delta.is_finite() {
            debug!(target: "combat::engine", delta, "ignored non-positive tick");
            return;
        }

        self.cooldowns.tick(delta);
        for combatant in self.roster.iter_mut() {
            combatant.conditions_mut().tick(delta);
        }
        self.statuses.tick(&mut self.roster, &mut self.events, delta);

        let impacts = self.projectiles.tick(&self.roster, delta);
        for impact in impacts {
            let Some(spell) = self.spells.get(impact.projectile.spell.as_str()) else {
                warn!(
                    target: "combat::engine",
                    spell = %impact.projectile.spell,
                    "projectile spell missing from book, impact dropped"
                );
                continue;
            };
            let mut ctx = CastContext {
                world: &mut self.roster,
                cooldowns: &mut self.cooldowns,
                statuses: &mut self.statuses,
                projectiles: &mut self.projectiles,
                events: &mut self.events,
            };
            self.spell_engine.resolve_impact(&mut ctx, spell, &impact);
        }
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> EngineSnapshot {
        let mut snapshot = EngineSnapshot {
            cooldowns: self
                .cooldowns
                .iter()
                .map(|(key, remaining)| (key.clone(), remaining))
                .collect(),
            status_effects: self.statuses.export(),
            last_effect_id: self.statuses.last_id(),
            projectiles: self.projectiles.iter().cloned().collect(),
            last_projectile_id: self.projectiles.last_id(),
            critical_rolls: self.spell_engine.rolls(),
            ..EngineSnapshot::default()
        };
        for combatant in self.roster.iter() {
            match combatant {
                Combatant::Character(character) => {
                    snapshot.characters.push(CharacterRecord::capture(character));
                }
                Combatant::Creature(creature) => {
                    snapshot.creatures.push(CreatureRecord::capture(creature));
                }
            }
        }
        snapshot
    }

    /// Restores mutable state onto the combatants already in the roster.
    ///
    /// Records whose id is missing (or names a different kind of combatant)
    /// are skipped with a warning. Cooldowns, effects and projectiles are
    /// replaced wholesale. Pending events are discarded.
    pub fn restore(&mut self, snapshot: &EngineSnapshot) {
        for record in &snapshot.characters {
            match self
                .roster
                .get_mut(record.id)
                .and_then(Combatant::as_character_mut)
            {
                Some(character) => record.apply(character),
                None => warn!(target: "combat::snapshot", id = %record.id, "character not in roster"),
            }
        }
        for record in &snapshot.creatures {
            match self.roster.get_mut(record.id) {
                Some(Combatant::Creature(creature)) => record.apply(creature),
                _ => warn!(target: "combat::snapshot", id = %record.id, "creature not in roster"),
            }
        }

        self.cooldowns = snapshot.cooldowns.iter().cloned().collect();
        self.statuses
            .restore(snapshot.status_effects.clone(), snapshot.last_effect_id);
        self.projectiles
            .restore(snapshot.projectiles.clone(), snapshot.last_projectile_id);
        self.spell_engine.set_rolls(snapshot.critical_rolls);
        self.events.clear();
        debug!(
            target: "combat::snapshot",
            characters = snapshot.characters.len(),
            creatures = snapshot.creatures.len(),
            effects = snapshot.status_effects.len(),
            "snapshot restored"
        );
    }
}
