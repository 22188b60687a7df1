//! Combat configuration constants and tunable parameters.

use crate::error::{ErrorSeverity, GameError};

/// Tunable combat parameters.
///
/// Hosts usually load this from `config.toml` through the content crate;
/// every field falls back to its default when omitted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Highest reachable character level.
    pub level_cap: u32,
    /// Fraction of current experience lost on death (levels above 1 only).
    pub death_experience_penalty: f32,
    /// Lower bound applied to every non-zero damage or healing roll.
    pub min_damage: i32,
    /// Tick interval used by periodic effects whose spell has no tick rate.
    pub default_tick_interval: f32,
    /// Damage-reduction points removed per unit of potency by defense debuffs.
    pub status_modifier_step: f32,
    /// Base seed for critical-hit rolls.
    pub rng_seed: u64,
    /// Number of loadout slots a character may fill.
    pub max_equipped_spells: usize,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Upper bound for `max_equipped_spells`; the loadout is a fixed-capacity array.
    pub const MAX_LOADOUT_SLOTS: usize = 6;
    /// Damage-reduction ceiling in percent.
    pub const MAX_DAMAGE_REDUCTION: f32 = 75.0;
    /// Movement-speed change per unit of potency for speed buffs and slows.
    pub const SPEED_MODIFIER_PER_POTENCY: f32 = 0.3;
    pub const STARTING_LEVEL: u32 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LEVEL_CAP: u32 = 99;
    pub const DEFAULT_DEATH_EXPERIENCE_PENALTY: f32 = 0.10;
    pub const DEFAULT_MIN_DAMAGE: i32 = 1;
    pub const DEFAULT_TICK_INTERVAL: f32 = 1.0;
    pub const DEFAULT_STATUS_MODIFIER_STEP: f32 = 10.0;
    pub const DEFAULT_RNG_SEED: u64 = 0x5eed_c0de;

    pub fn new() -> Self {
        Self {
            level_cap: Self::DEFAULT_LEVEL_CAP,
            death_experience_penalty: Self::DEFAULT_DEATH_EXPERIENCE_PENALTY,
            min_damage: Self::DEFAULT_MIN_DAMAGE,
            default_tick_interval: Self::DEFAULT_TICK_INTERVAL,
            status_modifier_step: Self::DEFAULT_STATUS_MODIFIER_STEP,
            rng_seed: Self::DEFAULT_RNG_SEED,
            max_equipped_spells: Self::MAX_LOADOUT_SLOTS,
        }
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Checks every field against its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level_cap < Self::STARTING_LEVEL {
            return Err(ConfigError::InvalidValue {
                field: "level_cap",
                reason: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.death_experience_penalty) {
            return Err(ConfigError::InvalidValue {
                field: "death_experience_penalty",
                reason: "must be within 0.0..=1.0",
            });
        }
        if self.min_damage < 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_damage",
                reason: "must not be negative",
            });
        }
        if self.default_tick_interval.is_nan() || self.default_tick_interval <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "default_tick_interval",
                reason: "must be positive",
            });
        }
        if self.status_modifier_step < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "status_modifier_step",
                reason: "must not be negative",
            });
        }
        if self.max_equipped_spells > Self::MAX_LOADOUT_SLOTS {
            return Err(ConfigError::InvalidValue {
                field: "max_equipped_spells",
                reason: "exceeds loadout capacity",
            });
        }
        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CombatConfig::default();
        assert_eq!(config.level_cap, 99);
        assert_eq!(config.min_damage, 1);
        assert_eq!(config.max_equipped_spells, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = CombatConfig::default();
        config.death_experience_penalty = 1.5;
        assert_eq!(
            config.validate().unwrap_err().error_code(),
            "CONFIG_INVALID_VALUE"
        );

        let mut config = CombatConfig::default();
        config.max_equipped_spells = 7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "max_equipped_spells",
                ..
            })
        ));

        let mut config = CombatConfig::default();
        config.default_tick_interval = 0.0;
        assert!(config.validate().is_err());
    }
}
