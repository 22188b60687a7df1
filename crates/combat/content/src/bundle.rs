//! Validated content ready to seed an engine.

use combat_core::{ClassCatalog, CombatConfig, CombatEngine, EntityId, SpellBook};
use glam::Vec2;
use tracing::debug;

use crate::error::ContentError;
use crate::templates::CreatureCatalog;
use crate::validate::validate_content;

/// Every catalog an engine host needs, checked for consistency on creation.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentBundle {
    config: CombatConfig,
    classes: ClassCatalog,
    spells: SpellBook,
    creatures: CreatureCatalog,
}

impl ContentBundle {
    pub fn new(
        config: CombatConfig,
        classes: ClassCatalog,
        spells: SpellBook,
        creatures: CreatureCatalog,
    ) -> Result<Self, ContentError> {
        validate_content(&config, &classes, &spells, &creatures)?;
        Ok(Self {
            config,
            classes,
            spells,
            creatures,
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn classes(&self) -> &ClassCatalog {
        &self.classes
    }

    pub fn spells(&self) -> &SpellBook {
        &self.spells
    }

    pub fn creatures(&self) -> &CreatureCatalog {
        &self.creatures
    }

    /// Constructs an empty engine over this content's config and spell book.
    pub fn build_engine(&self) -> CombatEngine {
        CombatEngine::new(self.config.clone(), self.spells.clone())
    }

    /// Spawns a level-1 character of the named class.
    pub fn spawn_character(
        &self,
        engine: &mut CombatEngine,
        name: &str,
        class: &str,
        position: Vec2,
    ) -> Option<EntityId> {
        let class = self.classes.get(class)?;
        let id = engine.spawn_character(name, class, position);
        debug!(target: "combat::content", %id, class = %class.name, "character spawned");
        Some(id)
    }

    /// Spawns a creature from its template.
    pub fn spawn_creature(
        &self,
        engine: &mut CombatEngine,
        template: &str,
        position: Vec2,
    ) -> Result<EntityId, ContentError> {
        let template = self
            .creatures
            .get(template)
            .ok_or_else(|| ContentError::UnknownCreature(template.to_string()))?;
        let id = engine.roster().next_id();
        engine.insert(template.spawn(id, position));
        debug!(target: "combat::content", %id, template = %template.name, "creature spawned");
        Ok(id)
    }
}
