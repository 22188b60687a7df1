//! Creature templates.
//!
//! A template is the static half of a creature: everything except its id,
//! position and live pools. Spawning stamps out a fresh [`Creature`].

use std::collections::BTreeMap;

use combat_core::{AttributeModifiers, Attributes, Creature, EntityId, SpellId};
use glam::Vec2;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "CreatureTemplate::default_level"))]
    pub level: u32,
    /// Attribute values; anything unlisted is 0.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: AttributeModifiers,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: Vec<SpellId>,
    #[cfg_attr(feature = "serde", serde(default = "CreatureTemplate::default_attack_range"))]
    pub attack_range: f32,
    #[cfg_attr(
        feature = "serde",
        serde(default = "CreatureTemplate::default_attack_cooldown")
    )]
    pub attack_cooldown: f32,
}

impl CreatureTemplate {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            attributes: AttributeModifiers::new(),
            spells: Vec::new(),
            attack_range: Self::default_attack_range(),
            attack_cooldown: Self::default_attack_cooldown(),
        }
    }

    fn default_level() -> u32 {
        1
    }

    fn default_attack_range() -> f32 {
        Creature::DEFAULT_ATTACK_RANGE
    }

    fn default_attack_cooldown() -> f32 {
        Creature::DEFAULT_ATTACK_COOLDOWN
    }

    pub fn spawn(&self, id: EntityId, position: Vec2) -> Creature {
        let attributes: Attributes = self.attributes.iter().map(|(k, v)| (*k, *v)).collect();
        let mut creature = Creature::new(id, self.name.clone(), self.level, attributes)
            .with_position(position)
            .with_spells(self.spells.iter().cloned());
        creature.attack_range = self.attack_range;
        creature.attack_cooldown = self.attack_cooldown;
        creature
    }
}

/// Creature templates keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreatureCatalog {
    templates: BTreeMap<String, CreatureTemplate>,
}

impl CreatureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: CreatureTemplate) -> Option<CreatureTemplate> {
        self.templates.insert(template.name.clone(), template)
    }

    pub fn get(&self, name: &str) -> Option<&CreatureTemplate> {
        self.templates.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CreatureTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<CreatureTemplate> for CreatureCatalog {
    fn from_iter<I: IntoIterator<Item = CreatureTemplate>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for template in iter {
            catalog.insert(template);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::AttributeKind;

    #[test]
    fn spawn_copies_template_fields() {
        let mut template = CreatureTemplate::new("Hound", 3);
        template.attributes.insert(AttributeKind::Offense, 6);
        template.spells.push(SpellId::from("Claw"));
        template.attack_range = 6.0;

        let creature = template.spawn(EntityId(4), Vec2::new(1.0, 2.0));
        assert_eq!(creature.id(), EntityId(4));
        assert_eq!(creature.level(), 3);
        assert_eq!(creature.attributes().get(AttributeKind::Offense), 6);
        assert_eq!(creature.attributes().get(AttributeKind::Resilience), 0);
        assert_eq!(creature.spells, vec![SpellId::from("Claw")]);
        assert_eq!(creature.attack_range, 6.0);
        assert_eq!(creature.attack_cooldown, Creature::DEFAULT_ATTACK_COOLDOWN);
        assert_eq!(creature.body().position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn catalog_keys_by_name() {
        let catalog: CreatureCatalog = [
            CreatureTemplate::new("Ghoul", 1),
            CreatureTemplate::new("Ghoul", 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Ghoul").map(|t| t.level), Some(2));
    }
}
