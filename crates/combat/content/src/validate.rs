//! Cross-reference checks over loaded content.

use combat_core::{ClassCatalog, CombatConfig, SpellBook};

use crate::error::ContentError;
use crate::templates::CreatureCatalog;

/// Verifies that every name one catalog uses resolves in another.
///
/// Stops at the first problem; content is authored by hand and one error at
/// a time is easier to act on.
pub fn validate_content(
    config: &CombatConfig,
    classes: &ClassCatalog,
    spells: &SpellBook,
    creatures: &CreatureCatalog,
) -> Result<(), ContentError> {
    config.validate()?;

    for class in classes.iter() {
        if let Some(spell) = class
            .starting_spells
            .iter()
            .find(|spell| !spells.contains(spell.as_str()))
        {
            return Err(ContentError::UnknownStartingSpell {
                class: class.name.clone(),
                spell: spell.clone(),
            });
        }
        if let Some(sub) = class.subclasses.iter().find(|s| s.parent_class != class.name) {
            return Err(ContentError::SubclassParentMismatch {
                class: class.name.clone(),
                subclass: sub.name.clone(),
                parent: sub.parent_class.clone(),
            });
        }
    }

    for spell in spells.iter() {
        if let Some(required) = &spell.class_requirement {
            if classes.get(required).is_none() {
                return Err(ContentError::UnknownClassRequirement {
                    spell: spell.id.clone(),
                    class: required.clone(),
                });
            }
        }
    }

    for creature in creatures.iter() {
        if let Some(spell) = creature
            .spells
            .iter()
            .find(|spell| !spells.contains(spell.as_str()))
        {
            return Err(ContentError::UnknownCreatureSpell {
                creature: creature.name.clone(),
                spell: spell.clone(),
            });
        }
    }

    Ok(())
}
