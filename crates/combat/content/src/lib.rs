//! Data-driven combat content and loaders.
//!
//! This crate houses the static combat data and the loaders that read it:
//! - Class catalog (RON)
//! - Spell book (RON)
//! - Creature templates (RON)
//! - Combat configuration (TOML)
//!
//! A default copy of every data file is embedded in the binary so hosts and
//! tests can build a ready-to-tick engine without touching the filesystem.
//! Content never appears in engine snapshots.

pub mod bundle;
pub mod error;
pub mod templates;
pub mod validate;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bundle::ContentBundle;
pub use error::ContentError;
pub use templates::{CreatureCatalog, CreatureTemplate};
pub use validate::validate_content;

#[cfg(feature = "loaders")]
pub use loaders::{
    ClassLoader, ConfigLoader, ContentFactory, CreatureLoader, LoadResult, SpellLoader,
};
