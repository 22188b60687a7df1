//! Creature template loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::templates::{CreatureCatalog, CreatureTemplate};

#[derive(serde::Deserialize)]
struct CreatureFile {
    creatures: Vec<CreatureTemplate>,
}

/// Loader for creature templates from RON files.
pub struct CreatureLoader;

impl CreatureLoader {
    pub fn load(path: &Path) -> LoadResult<CreatureCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CreatureCatalog> {
        let file: CreatureFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse creatures RON: {}", e))?;

        let mut catalog = CreatureCatalog::new();
        for template in file.creatures {
            if template.attack_cooldown <= 0.0 {
                anyhow::bail!(
                    "Creature {} needs a positive attack cooldown",
                    template.name
                );
            }
            let name = template.name.clone();
            if catalog.insert(template).is_some() {
                anyhow::bail!("Duplicate creature template: {}", name);
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::embedded;
    use combat_core::{AttributeKind, Creature};

    #[test]
    fn embedded_creatures() {
        let catalog = CreatureLoader::parse(embedded::CREATURES).unwrap();
        assert_eq!(catalog.len(), 3);

        let ghoul = catalog.get("Ghoul").unwrap();
        assert_eq!(ghoul.level, 1);
        assert!(ghoul.attributes.is_empty());

        let golem = catalog.get("Scrap Golem").unwrap();
        assert_eq!(golem.attributes.get(&AttributeKind::Resilience), Some(&12));
    }

    #[test]
    fn minimal_template() {
        let catalog = CreatureLoader::parse(r#"(creatures: [(name: "Rat")])"#).unwrap();
        let rat = catalog.get("Rat").unwrap();
        assert_eq!(rat.level, 1);
        assert_eq!(rat.attack_range, Creature::DEFAULT_ATTACK_RANGE);
        assert!(rat.spells.is_empty());
    }

    #[test]
    fn zero_cooldown_is_rejected() {
        let ron = r#"(creatures: [(name: "Rat", attack_cooldown: 0.0)])"#;
        assert!(CreatureLoader::parse(ron).is_err());
    }
}
