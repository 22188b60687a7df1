//! Class catalog loader.

use std::path::Path;

use combat_core::{ClassCatalog, ClassDefinition};

use crate::loaders::{LoadResult, read_file};

#[derive(serde::Deserialize)]
struct ClassFile {
    classes: Vec<ClassDefinition>,
}

/// Loader for class definitions from RON files.
///
/// RON format: `(classes: [ (name: "...", resource_type: Rage, ...), ... ])`
pub struct ClassLoader;

impl ClassLoader {
    pub fn load(path: &Path) -> LoadResult<ClassCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ClassCatalog> {
        let file: ClassFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse classes RON: {}", e))?;

        let mut catalog = ClassCatalog::new();
        for class in file.classes {
            let name = class.name.clone();
            if catalog.insert(class).is_some() {
                anyhow::bail!("Duplicate class definition: {}", name);
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::embedded;
    use combat_core::{AttributeKind, ResourceType};

    #[test]
    fn embedded_classes_match_builtin() {
        let catalog = ClassLoader::parse(embedded::CLASSES).unwrap();
        let builtin = ClassCatalog::builtin();
        assert_eq!(catalog.len(), 4);

        for class in builtin.iter() {
            let loaded = catalog.get(&class.name).unwrap();
            assert_eq!(loaded.resource_type, class.resource_type);
            assert_eq!(loaded.starting_attributes(), class.starting_attributes());
            assert_eq!(loaded.stat_bonuses, class.stat_bonuses);
            assert_eq!(loaded.starting_spells, class.starting_spells);
        }
    }

    #[test]
    fn brawler_has_a_subclass() {
        let catalog = ClassLoader::parse(embedded::CLASSES).unwrap();
        let brawler = catalog.get("Brawler").unwrap();
        assert_eq!(brawler.resource_type, ResourceType::Rage);
        let pit_fighter = brawler.subclass("Pit Fighter").unwrap();
        assert_eq!(
            pit_fighter.attribute_modifiers.get(&AttributeKind::Offense),
            Some(&2)
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let ron = r#"(classes: [
            (name: "Brawler", resource_type: Rage, base_attributes: {}),
            (name: "Brawler", resource_type: Rage, base_attributes: {}),
        ])"#;
        let err = ClassLoader::parse(ron).unwrap_err();
        assert!(err.to_string().contains("Duplicate class"));
    }
}
