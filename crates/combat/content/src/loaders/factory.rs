//! Content factory for building engines from data files.

use std::path::{Path, PathBuf};

use combat_core::{ClassCatalog, CombatConfig, SpellBook};
use tracing::{debug, info};

use crate::bundle::ContentBundle;
use crate::loaders::{ClassLoader, ConfigLoader, CreatureLoader, LoadResult, SpellLoader, embedded};
use crate::templates::CreatureCatalog;

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// ├── classes.ron
/// ├── spells.ron
/// └── creatures.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(target: "combat::content", path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load class catalog from `classes.ron`.
    pub fn load_classes(&self) -> LoadResult<ClassCatalog> {
        ClassLoader::load(&self.data_dir.join("classes.ron"))
    }

    /// Load spell book from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellBook> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    /// Load creature templates from `creatures.ron`.
    pub fn load_creatures(&self) -> LoadResult<CreatureCatalog> {
        CreatureLoader::load(&self.data_dir.join("creatures.ron"))
    }

    /// Loads every file and cross-checks the result.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle::new(
            self.load_config()?,
            self.load_classes()?,
            self.load_spells()?,
            self.load_creatures()?,
        )
        .map_err(|e| anyhow::anyhow!("Inconsistent content in {}: {}", self.data_dir.display(), e))?;

        info!(
            target: "combat::content",
            dir = %self.data_dir.display(),
            classes = bundle.classes().len(),
            spells = bundle.spells().len(),
            creatures = bundle.creatures().len(),
            "content loaded"
        );
        Ok(bundle)
    }

    /// Builds the bundle from the data files compiled into this crate.
    pub fn embedded() -> LoadResult<ContentBundle> {
        let bundle = ContentBundle::new(
            ConfigLoader::parse(embedded::CONFIG)?,
            ClassLoader::parse(embedded::CLASSES)?,
            SpellLoader::parse(embedded::SPELLS)?,
            CreatureLoader::parse(embedded::CREATURES)?,
        )
        .map_err(|e| anyhow::anyhow!("Inconsistent embedded content: {}", e))?;
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn embedded_content_is_consistent() {
        let bundle = ContentFactory::embedded().unwrap();
        assert_eq!(bundle.classes().len(), 4);
        assert_eq!(bundle.creatures().len(), 3);
        for class in bundle.classes().iter() {
            let exclusive = bundle
                .spells()
                .iter()
                .filter(|spell| spell.class_requirement.as_deref() == Some(class.name.as_str()))
                .count();
            assert_eq!(exclusive, 3, "{}", class.name);
        }
    }
}
