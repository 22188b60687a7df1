//! Player-side characters.
//!
//! A character owns its attributes, the derived stat cache, the vitals
//! ledger, level/experience and a small loadout of equipped spells. Every
//! mutation that can move a stat input (attribute writes, level-ups,
//! subclass selection) recomputes the cache before returning.

use arrayvec::ArrayVec;
use glam::Vec2;
use tracing::info;

use super::{Allegiance, Conditions, Damageable, SpellCaster, StatusEffectTarget, StatusModifier};
use crate::attributes::{AttributeChange, AttributeKind, Attributes};
use crate::class::{ClassDefinition, SubclassDefinition};
use crate::combat::DamageInfo;
use crate::config::CombatConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::ids::{EffectId, EntityId, SpellId};
use crate::spatial::Body;
use crate::spell::SpellDefinition;
use crate::stats::{Progression, StatSheet};
use crate::vitals::{DamageOutcome, Vitals};

/// Errors raised by character progression and loadout management.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CharacterError {
    #[error("a subclass has already been selected")]
    SubclassAlreadySelected,

    #[error("subclass `{subclass}` belongs to `{expected}`, not `{class}`")]
    SubclassClassMismatch {
        subclass: String,
        expected: String,
        class: String,
    },

    #[error("all {slots} loadout slots are in use")]
    LoadoutFull { slots: usize },

    #[error("spell `{0}` is already equipped")]
    SpellAlreadyEquipped(SpellId),

    #[error("spell requires level {required}, character is level {level}")]
    LevelRequirement { required: u32, level: u32 },

    #[error("spell is restricted to class `{required}`")]
    ClassRequirement { required: String },
}

impl GameError for CharacterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SubclassAlreadySelected => "CHARACTER_SUBCLASS_ALREADY_SELECTED",
            Self::SubclassClassMismatch { .. } => "CHARACTER_SUBCLASS_CLASS_MISMATCH",
            Self::LoadoutFull { .. } => "CHARACTER_LOADOUT_FULL",
            Self::SpellAlreadyEquipped(_) => "CHARACTER_SPELL_ALREADY_EQUIPPED",
            Self::LevelRequirement { .. } => "CHARACTER_LEVEL_REQUIREMENT",
            Self::ClassRequirement { .. } => "CHARACTER_CLASS_REQUIREMENT",
        }
    }
}

/// Per-character copy of the progression rules from [`CombatConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRules {
    pub level_cap: u32,
    pub death_experience_penalty: f32,
    pub loadout_slots: usize,
}

impl From<&CombatConfig> for CharacterRules {
    fn from(config: &CombatConfig) -> Self {
        Self {
            level_cap: config.level_cap,
            death_experience_penalty: config.death_experience_penalty,
            loadout_slots: config.max_equipped_spells.min(CombatConfig::MAX_LOADOUT_SLOTS),
        }
    }
}

impl Default for CharacterRules {
    fn default() -> Self {
        Self::from(&CombatConfig::default())
    }
}

type Loadout = ArrayVec<SpellId, { CombatConfig::MAX_LOADOUT_SLOTS }>;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    id: EntityId,
    name: String,
    class: ClassDefinition,
    subclass: Option<SubclassDefinition>,
    progression: Progression,
    attributes: Attributes,
    /// Cache; rebuilt by `recalculate_stats`.
    stats: StatSheet,
    vitals: Vitals,
    conditions: Conditions,
    body: Body,
    allegiance: Allegiance,
    move_speed: f32,
    loadout: Loadout,
    rules: CharacterRules,
    death_penalty: Option<u64>,
}

impl Character {
    pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

    /// Creates a level-1 character at full health and resource.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        class: &ClassDefinition,
        rules: CharacterRules,
    ) -> Self {
        let attributes = class.starting_attributes();
        let progression = Progression::new();
        let stats = StatSheet::compute(&attributes, progression.level, Some(&class.stat_bonuses));
        let allegiance = Allegiance::Player;

        Self {
            id,
            name: name.into(),
            class: class.clone(),
            subclass: None,
            progression,
            attributes,
            vitals: Vitals::new(stats.maximums),
            stats,
            conditions: Conditions::new(),
            body: Body::new(Vec2::ZERO, allegiance.layer()),
            allegiance,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            loadout: Loadout::new(),
            rules,
            death_penalty: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.body.position = position;
        self
    }

    #[must_use]
    pub fn with_allegiance(mut self, allegiance: Allegiance) -> Self {
        self.allegiance = allegiance;
        self.body.layer = allegiance.layer();
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &ClassDefinition {
        &self.class
    }

    pub fn subclass(&self) -> Option<&SubclassDefinition> {
        self.subclass.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn experience(&self) -> u64 {
        self.progression.experience
    }

    pub fn experience_to_next_level(&self) -> u64 {
        self.progression.experience_to_next_level()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Registers an attribute observer. Observers are not cloned with the
    /// character and are not persisted.
    pub fn on_attribute_change(
        &mut self,
        observer: impl FnMut(&AttributeChange) + Send + 'static,
    ) {
        self.attributes.subscribe(observer);
    }

    pub fn stats(&self) -> &StatSheet {
        &self.stats
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut Conditions {
        &mut self.conditions
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn allegiance(&self) -> Allegiance {
        self.allegiance
    }

    pub fn base_move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn rules(&self) -> CharacterRules {
        self.rules
    }

    /// Experience lost at death; `None` while alive.
    pub fn death_penalty(&self) -> Option<u64> {
        self.death_penalty
    }

    // ------------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------------

    /// Rebuilds the derived stat cache and clamps vitals to the new maxima.
    pub fn recalculate_stats(&mut self) {
        self.stats = StatSheet::compute(
            &self.attributes,
            self.progression.level,
            Some(&self.class.stat_bonuses),
        );
        self.vitals.set_maximums(self.stats.maximums);
    }

    pub fn set_attribute(&mut self, kind: AttributeKind, value: i32) -> Option<AttributeChange> {
        let change = self.attributes.set(kind, value);
        if change.is_some() {
            self.recalculate_stats();
        }
        change
    }

    pub fn modify_attribute(&mut self, kind: AttributeKind, delta: i32) -> Option<AttributeChange> {
        self.set_attribute(kind, self.attributes.get(kind).saturating_add(delta))
    }

    /// Selects the character's one subclass and applies its attribute bonuses.
    pub fn select_subclass(
        &mut self,
        subclass: &SubclassDefinition,
    ) -> Result<Vec<AttributeChange>, CharacterError> {
        if self.subclass.is_some() {
            return Err(CharacterError::SubclassAlreadySelected);
        }
        if subclass.parent_class != self.class.name {
            return Err(CharacterError::SubclassClassMismatch {
                subclass: subclass.name.clone(),
                expected: subclass.parent_class.clone(),
                class: self.class.name.clone(),
            });
        }

        let changes = self
            .attributes
            .apply_modifiers(subclass.attribute_modifiers.iter().map(|(k, v)| (*k, *v)));
        self.subclass = Some(subclass.clone());
        self.recalculate_stats();
        Ok(changes)
    }

    // ------------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------------

    pub fn at_level_cap(&self) -> bool {
        self.progression.level >= self.rules.level_cap
    }

    /// Adds experience, levelling up as many times as it pays for.
    ///
    /// A level-up recomputes stats and refills health and resource. Experience
    /// granted at the level cap is discarded. Returns the number of levels
    /// gained.
    pub fn gain_experience(&mut self, amount: u64) -> u32 {
        let gained = self.progression.gain(amount, self.rules.level_cap);
        if gained > 0 {
            self.recalculate_stats();
            self.vitals.refill();
            info!(
                target: "combat::progression",
                character = %self.id,
                level = self.progression.level,
                "level up"
            );
        }
        gained
    }

    // ------------------------------------------------------------------------
    // Loadout
    // ------------------------------------------------------------------------

    pub fn loadout(&self) -> &[SpellId] {
        &self.loadout
    }

    pub fn equipped(&self, slot: usize) -> Option<&SpellId> {
        self.loadout.get(slot)
    }

    /// Equips `spell` in the next free slot, returning the slot index.
    pub fn equip_spell(&mut self, spell: &SpellDefinition) -> Result<usize, CharacterError> {
        if self.loadout.iter().any(|id| *id == spell.id) {
            return Err(CharacterError::SpellAlreadyEquipped(spell.id.clone()));
        }
        if self.loadout.len() >= self.rules.loadout_slots {
            return Err(CharacterError::LoadoutFull {
                slots: self.rules.loadout_slots,
            });
        }
        if spell.level_requirement > self.progression.level {
            return Err(CharacterError::LevelRequirement {
                required: spell.level_requirement,
                level: self.progression.level,
            });
        }
        if let Some(required) = &spell.class_requirement {
            if *required != self.class.name {
                return Err(CharacterError::ClassRequirement {
                    required: required.clone(),
                });
            }
        }

        self.loadout
            .try_push(spell.id.clone())
            .map_err(|_| CharacterError::LoadoutFull {
                slots: self.rules.loadout_slots,
            })?;
        Ok(self.loadout.len() - 1)
    }

    pub fn unequip_spell(&mut self, spell: &SpellId) -> bool {
        match self.loadout.iter().position(|id| id == spell) {
            Some(slot) => {
                self.loadout.remove(slot);
                true
            }
            None => false,
        }
    }

    /// Restores persisted progress and pools (used by snapshot restore).
    ///
    /// Observers subscribed to the live attribute store are kept.
    pub(crate) fn restore_state(
        &mut self,
        attributes: &Attributes,
        progression: Progression,
        vitals: Vitals,
        death_penalty: Option<u64>,
    ) {
        for (kind, value) in attributes.iter() {
            self.attributes.set(kind, value);
        }
        self.progression = progression;
        self.recalculate_stats();
        self.vitals = vitals;
        self.death_penalty = death_penalty;
    }
}

impl Damageable for Character {
    fn take_damage(&mut self, info: &DamageInfo) -> DamageOutcome {
        let outcome = self.vitals.take_damage(info.amount);
        match outcome {
            DamageOutcome::Killed { .. } => {
                let lost = self
                    .progression
                    .apply_death_penalty(self.rules.death_experience_penalty);
                self.death_penalty = Some(lost);
                info!(
                    target: "combat::death",
                    character = %self.id,
                    killer = %info.source,
                    experience_lost = lost,
                    "character died"
                );
            }
            DamageOutcome::Wounded { .. } => self.conditions.stun(info.stun_duration),
            DamageOutcome::Ignored => {}
        }
        outcome
    }

    fn heal(&mut self, amount: i32) -> i32 {
        self.vitals.heal(amount)
    }

    fn is_dead(&self) -> bool {
        self.vitals.is_dead()
    }
}

impl SpellCaster for Character {
    fn caster_id(&self) -> EntityId {
        self.id
    }

    fn caster_attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn is_stunned(&self) -> bool {
        self.conditions.is_stunned()
    }

    fn available_resource(&self) -> Option<i32> {
        Some(self.vitals.resource())
    }

    fn consume_resource(&mut self, amount: i32) -> bool {
        self.vitals.consume_resource(amount)
    }
}

impl StatusEffectTarget for Character {
    fn attach_modifier(&mut self, id: EffectId, modifier: StatusModifier) {
        self.conditions.attach(id, modifier);
    }

    fn detach_modifier(&mut self, id: EffectId) -> Option<StatusModifier> {
        self.conditions.detach(id)
    }
}
