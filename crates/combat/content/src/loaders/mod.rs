//! Content loaders for reading combat data from files.
//!
//! Catalogs are RON, configuration is TOML. Each loader can parse from a path
//! or from an in-memory string; the embedded defaults go through the latter.

pub mod classes;
pub mod config;
pub mod creatures;
pub mod factory;
pub mod spells;

pub use classes::ClassLoader;
pub use config::ConfigLoader;
pub use creatures::CreatureLoader;
pub use factory::ContentFactory;
pub use spells::SpellLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Default data files compiled into the crate.
pub mod embedded {
    pub const CONFIG: &str = include_str!("../../data/config.toml");
    pub const CLASSES: &str = include_str!("../../data/classes.ron");
    pub const SPELLS: &str = include_str!("../../data/spells.ron");
    pub const CREATURES: &str = include_str!("../../data/creatures.ron");
}

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
