//! Persistable engine state.
//!
//! A snapshot holds the mutable part of a simulation: attributes, progress,
//! pools and conditions of every combatant, plus the cooldown, status-effect
//! and projectile collections. Static data (classes, spell book, creature
//! templates) and derived stats are not stored; restore recomputes stats from
//! the restored attributes.

use glam::Vec2;

use crate::attributes::Attributes;
use crate::cooldown::CooldownKey;
use crate::entity::{Character, Conditions, Creature};
use crate::ids::{EffectId, EntityId};
use crate::projectile::Projectile;
use crate::stats::Progression;
use crate::status::ActiveStatusEffect;
use crate::vitals::Vitals;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRecord {
    pub id: EntityId,
    pub attributes: Attributes,
    pub progression: Progression,
    pub vitals: Vitals,
    pub conditions: Conditions,
    pub position: Vec2,
    pub death_penalty: Option<u64>,
}

impl CharacterRecord {
    pub fn capture(character: &Character) -> Self {
        Self {
            id: character.id(),
            attributes: character.attributes().clone(),
            progression: Progression {
                level: character.level(),
                experience: character.experience(),
            },
            vitals: *character.vitals(),
            conditions: character.conditions().clone(),
            position: character.body().position,
            death_penalty: character.death_penalty(),
        }
    }

    pub(crate) fn apply(&self, character: &mut Character) {
        character.restore_state(
            &self.attributes,
            self.progression,
            self.vitals,
            self.death_penalty,
        );
        *character.conditions_mut() = self.conditions.clone();
        character.body_mut().position = self.position;
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureRecord {
    pub id: EntityId,
    pub vitals: Vitals,
    pub conditions: Conditions,
    pub position: Vec2,
}

impl CreatureRecord {
    pub fn capture(creature: &Creature) -> Self {
        Self {
            id: creature.id(),
            vitals: *creature.vitals(),
            conditions: creature.conditions().clone(),
            position: creature.body().position,
        }
    }

    pub(crate) fn apply(&self, creature: &mut Creature) {
        creature.restore_vitals(self.vitals);
        *creature.conditions_mut() = self.conditions.clone();
        creature.body_mut().position = self.position;
    }
}

/// Everything [`crate::engine::CombatEngine::restore`] needs to resume a
/// simulation, ordered by entity id so equal states compare and hash equal.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineSnapshot {
    pub characters: Vec<CharacterRecord>,
    pub creatures: Vec<CreatureRecord>,
    pub cooldowns: Vec<(CooldownKey, f32)>,
    pub status_effects: Vec<ActiveStatusEffect>,
    pub last_effect_id: EffectId,
    pub projectiles: Vec<Projectile>,
    pub last_projectile_id: u64,
    /// Critical rolls made so far; keeps crit seeds unique after restore.
    pub critical_rolls: u64,
}

impl EngineSnapshot {
    pub fn character(&self, id: EntityId) -> Option<&CharacterRecord> {
        self.characters.iter().find(|record| record.id == id)
    }

    pub fn creature(&self, id: EntityId) -> Option<&CreatureRecord> {
        self.creatures.iter().find(|record| record.id == id)
    }

    /// SHA-256 over the bincode encoding of each section, in field order.
    ///
    /// Two runs fed the same inputs produce the same digest; used to compare
    /// simulation runs without diffing whole snapshots.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        let sections: [Result<Vec<u8>, bincode::Error>; 5] = [
            bincode::serialize(&self.characters),
            bincode::serialize(&self.creatures),
            bincode::serialize(&self.cooldowns),
            bincode::serialize(&self.status_effects),
            bincode::serialize(&self.projectiles),
        ];
        for bytes in sections.into_iter().flatten() {
            hasher.update(&bytes);
        }
        hasher.update(self.last_effect_id.0.to_le_bytes());
        hasher.update(self.last_projectile_id.to_le_bytes());
        hasher.update(self.critical_rolls.to_le_bytes());

        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassCatalog;
    use crate::combat::{DamageInfo, DamageType};
    use crate::entity::{CharacterRules, Damageable};

    fn brawler() -> Character {
        let catalog = ClassCatalog::builtin();
        Character::new(
            EntityId(1),
            "Rook",
            catalog.get("Brawler").unwrap(),
            CharacterRules::default(),
        )
    }

    #[test]
    fn character_record_round_trips_mutable_state() {
        let mut original = brawler().with_position(Vec2::new(3.0, 4.0));
        original.gain_experience(450);
        original.take_damage(&DamageInfo::new(EntityId(9), 40, DamageType::True));
        original.conditions_mut().stun(0.5);
        let record = CharacterRecord::capture(&original);

        let mut fresh = brawler();
        record.apply(&mut fresh);

        assert_eq!(fresh.level(), 2);
        assert_eq!(fresh.attributes(), original.attributes());
        assert_eq!(fresh.stats(), original.stats());
        assert_eq!(fresh.vitals(), original.vitals());
        assert_eq!(fresh.conditions(), original.conditions());
        assert_eq!(fresh.body().position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn creature_record_restores_pools_and_position() {
        let mut original =
            Creature::new(EntityId(2), "Ghoul", 1, Attributes::new()).with_position(Vec2::X);
        original.take_damage(&DamageInfo::new(EntityId(1), 30, DamageType::Physical));
        let record = CreatureRecord::capture(&original);

        let mut fresh = Creature::new(EntityId(2), "Ghoul", 1, Attributes::new());
        record.apply(&mut fresh);
        assert_eq!(fresh, original);
    }

    #[test]
    fn lookups_by_id() {
        let snapshot = EngineSnapshot {
            characters: vec![CharacterRecord::capture(&brawler())],
            ..EngineSnapshot::default()
        };
        assert!(snapshot.character(EntityId(1)).is_some());
        assert!(snapshot.creature(EntityId(1)).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_tracks_content() {
        let empty = EngineSnapshot::default();
        let mut moved = empty.clone();
        moved.critical_rolls = 1;

        assert_eq!(empty.digest(), EngineSnapshot::default().digest());
        assert_ne!(hex::encode(empty.digest()), hex::encode(moved.digest()));
    }
}
