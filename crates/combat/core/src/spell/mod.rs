//! Spell definitions and the spell book they are looked up in.
//!
//! Definitions are immutable data loaded from content files. Behavior lives
//! in [`crate::cast`]; nothing here mutates simulation state.

pub mod book;
pub mod definition;

pub use book::SpellBook;
pub use definition::{
    AreaOfEffect, ChannelProfile, ProjectileProfile, Scaling, SpellDefinition, SpellType,
    StatusEffectSpec, TargetingMode,
};
