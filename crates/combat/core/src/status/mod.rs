//! Status effects: timed modifiers and periodic payloads attached to targets.
//!
//! The [`StatusEffectManager`] owns every active effect, keyed by target, so
//! effects are ticked centrally instead of by the entities they sit on.
//! Targets only carry the reversible modifiers an effect attaches (see
//! [`crate::entity::Conditions`]).

pub mod effect;
pub mod manager;
pub mod visuals;

pub use effect::{ActiveStatusEffect, EffectProgress, StatusApplication, StatusEffectKind};
pub use manager::StatusEffectManager;
pub use visuals::{EffectVisuals, NoVisuals, VisualHandle};
