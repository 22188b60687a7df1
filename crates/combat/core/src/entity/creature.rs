//! Hostile creatures.
//!
//! Creatures share the attribute and vitals model with characters but have
//! no resource pool, no class and no progression. Their spell list and attack
//! cadence are data for whatever AI drives them.

use glam::Vec2;
use tracing::info;

use super::{Allegiance, Conditions, Damageable, SpellCaster, StatusEffectTarget, StatusModifier};
use crate::attributes::Attributes;
use crate::combat::DamageInfo;
use crate::ids::{EffectId, EntityId, SpellId};
use crate::spatial::Body;
use crate::stats::{ResourceMaximums, StatSheet};
use crate::vitals::{DamageOutcome, Vitals};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Creature {
    id: EntityId,
    name: String,
    level: u32,
    attributes: Attributes,
    stats: StatSheet,
    vitals: Vitals,
    conditions: Conditions,
    body: Body,
    allegiance: Allegiance,
    move_speed: f32,
    /// Spells the creature picks from when attacking.
    pub spells: Vec<SpellId>,
    /// Distance at which the creature starts attacking.
    pub attack_range: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
}

impl Creature {
    pub const DEFAULT_MOVE_SPEED: f32 = 3.0;
    pub const DEFAULT_ATTACK_RANGE: f32 = 5.0;
    pub const DEFAULT_ATTACK_COOLDOWN: f32 = 2.0;

    pub fn new(id: EntityId, name: impl Into<String>, level: u32, attributes: Attributes) -> Self {
        let level = level.max(1);
        let stats = StatSheet::compute(&attributes, level, None);
        let allegiance = Allegiance::Enemy;
        let pools = ResourceMaximums {
            health: stats.maximums.health,
            resource: 0,
        };

        Self {
            id,
            name: name.into(),
            level,
            attributes,
            vitals: Vitals::new(pools),
            stats,
            conditions: Conditions::new(),
            body: Body::new(Vec2::ZERO, allegiance.layer()),
            allegiance,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            spells: Vec::new(),
            attack_range: Self::DEFAULT_ATTACK_RANGE,
            attack_cooldown: Self::DEFAULT_ATTACK_COOLDOWN,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.body.position = position;
        self
    }

    #[must_use]
    pub fn with_spells(mut self, spells: impl IntoIterator<Item = SpellId>) -> Self {
        self.spells = spells.into_iter().collect();
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
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

    pub(crate) fn restore_vitals(&mut self, vitals: Vitals) {
        self.vitals = vitals;
    }
}

impl Damageable for Creature {
    fn take_damage(&mut self, info: &DamageInfo) -> DamageOutcome {
        let outcome = self.vitals.take_damage(info.amount);
        match outcome {
            DamageOutcome::Killed { .. } => {
                info!(
                    target: "combat::death",
                    creature = %self.id,
                    killer = %info.source,
                    "creature died"
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

impl SpellCaster for Creature {
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
        None
    }

    fn consume_resource(&mut self, _amount: i32) -> bool {
        true
    }
}

impl StatusEffectTarget for Creature {
    fn attach_modifier(&mut self, id: EffectId, modifier: StatusModifier) {
        self.conditions.attach(id, modifier);
    }

    fn detach_modifier(&mut self, id: EffectId) -> Option<StatusModifier> {
        self.conditions.detach(id)
    }
}
