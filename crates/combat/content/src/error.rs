//! Content consistency errors.
//!
//! Parse and I/O failures surface through the loaders as `anyhow` errors.
//! `ContentError` covers data that parsed fine but does not hang together.

use combat_core::{ConfigError, ErrorSeverity, GameError, SpellId};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("class `{class}` starts with unknown spell `{spell}`")]
    UnknownStartingSpell { class: String, spell: SpellId },

    #[error("creature `{creature}` uses unknown spell `{spell}`")]
    UnknownCreatureSpell { creature: String, spell: SpellId },

    #[error("spell `{spell}` requires unknown class `{class}`")]
    UnknownClassRequirement { spell: SpellId, class: String },

    #[error("subclass `{subclass}` is filed under `{class}` but names `{parent}` as parent")]
    SubclassParentMismatch {
        class: String,
        subclass: String,
        parent: String,
    },

    #[error("unknown creature template `{0}`")]
    UnknownCreature(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStartingSpell { .. } => "CONTENT_UNKNOWN_STARTING_SPELL",
            Self::UnknownCreatureSpell { .. } => "CONTENT_UNKNOWN_CREATURE_SPELL",
            Self::UnknownClassRequirement { .. } => "CONTENT_UNKNOWN_CLASS_REQUIREMENT",
            Self::SubclassParentMismatch { .. } => "CONTENT_SUBCLASS_PARENT_MISMATCH",
            Self::UnknownCreature(_) => "CONTENT_UNKNOWN_CREATURE",
            Self::Config(_) => "CONTENT_INVALID_CONFIG",
        }
    }
}
