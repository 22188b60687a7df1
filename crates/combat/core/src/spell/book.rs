//! Keyed spell storage with the lookups loadout screens and AI need.

use std::collections::BTreeMap;

use super::{SpellDefinition, SpellType};
use crate::ids::SpellId;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpellBook {
    spells: BTreeMap<SpellId, SpellDefinition>,
}

impl SpellBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a spell, keyed by its id.
    pub fn insert(&mut self, spell: SpellDefinition) -> Option<SpellDefinition> {
        self.spells.insert(spell.id.clone(), spell)
    }

    pub fn get(&self, name: &str) -> Option<&SpellDefinition> {
        self.spells.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.spells.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellDefinition> {
        self.spells.values()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// Spells usable by `class` up to `max_level`, including class-neutral ones.
    pub fn by_class<'a>(
        &'a self,
        class: &'a str,
        max_level: u32,
    ) -> impl Iterator<Item = &'a SpellDefinition> + 'a {
        self.spells.values().filter(move |spell| {
            spell.level_requirement <= max_level
                && spell
                    .class_requirement
                    .as_deref()
                    .is_none_or(|required| required == class)
        })
    }

    pub fn by_type(&self, spell_type: SpellType) -> impl Iterator<Item = &SpellDefinition> {
        self.spells
            .values()
            .filter(move |spell| spell.spell_type == spell_type)
    }

    pub fn by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SpellDefinition> + 'a {
        self.spells.values().filter(move |spell| spell.has_tag(tag))
    }
}

impl FromIterator<SpellDefinition> for SpellBook {
    fn from_iter<T: IntoIterator<Item = SpellDefinition>>(iter: T) -> Self {
        let mut book = Self::new();
        for spell in iter {
            book.insert(spell);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> SpellBook {
        let mut punch = SpellDefinition::new("Heavy Punch", SpellType::Attack);
        punch.class_requirement = Some("Brawler".into());
        punch.tags = vec!["melee".into()];

        let mut shot = SpellDefinition::new("Quick Shot", SpellType::Attack);
        shot.class_requirement = Some("Gunslinger".into());
        shot.tags = vec!["ranged".into()];

        let mut mend = SpellDefinition::new("Mend", SpellType::Healing);
        mend.level_requirement = 3;

        [punch, shot, mend].into_iter().collect()
    }

    #[test]
    fn lookup_by_name() {
        let book = book();
        assert_eq!(book.len(), 3);
        assert!(book.get("Heavy Punch").is_some());
        assert!(!book.contains("Fireball"));
    }

    #[test]
    fn class_filter_includes_neutral_spells_within_level() {
        let book = book();
        let names: Vec<_> = book.by_class("Brawler", 1).map(|s| s.name()).collect();
        assert_eq!(names, vec!["Heavy Punch"]);

        let names: Vec<_> = book.by_class("Brawler", 5).map(|s| s.name()).collect();
        assert_eq!(names, vec!["Heavy Punch", "Mend"]);
    }

    #[test]
    fn type_and_tag_filters() {
        let book = book();
        assert_eq!(book.by_type(SpellType::Healing).count(), 1);
        assert_eq!(book.by_tag("ranged").next().map(|s| s.name()), Some("Quick Shot"));
    }
}
