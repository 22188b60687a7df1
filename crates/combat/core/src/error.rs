//! Shared error infrastructure for combat-core.
//!
//! Domain errors (`CastError`, `CharacterError`, `ConfigError`) live next to
//! the operations that produce them. This module only holds what they have
//! in common: a severity classification used by hosts to decide between
//! "show a hint to the player" and "log and investigate".
//!
//! Gameplay rejections are ordinary values here. A cast that fails because
//! the caster is out of range is `Recoverable`, is logged at debug level and
//! never unwinds.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected gameplay rejection; retrying later or elsewhere may succeed.
    ///
    /// Examples: spell on cooldown, target out of range, caster stunned
    Recoverable,

    /// Invalid input or configuration; retrying unchanged will fail again.
    ///
    /// Examples: unknown caster, unknown spell, zero-length direction
    Validation,

    /// Unexpected state inconsistency that points at a bug.
    Internal,

    /// Simulation state can no longer be trusted.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// - Every error enum implements this trait
/// - `thiserror` provides `Display`/`Error`
/// - Severity reflects recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable identifier for this error variant, suitable for
    /// metrics and assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
