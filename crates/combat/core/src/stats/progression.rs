//! Level and experience bookkeeping.
//!
//! Experience is cumulative. Reaching level `n` requires `100 × n²` total
//! experience, so a fresh level-1 character needs 400 to reach level 2.

use crate::config::CombatConfig;

/// Total experience required to reach `target_level`.
#[inline]
pub const fn experience_for_level(target_level: u32) -> u64 {
    let level = target_level as u64;
    100 * level * level
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub level: u32,
    pub experience: u64,
}

impl Progression {
    pub const fn new() -> Self {
        Self {
            level: CombatConfig::STARTING_LEVEL,
            experience: 0,
        }
    }

    pub const fn experience_to_next_level(&self) -> u64 {
        experience_for_level(self.level + 1)
    }

    /// Adds experience and returns how many levels were gained.
    ///
    /// Gains at or above `level_cap` are discarded.
    pub fn gain(&mut self, amount: u64, level_cap: u32) -> u32 {
        if self.level >= level_cap {
            return 0;
        }

        self.experience = self.experience.saturating_add(amount);
        let start = self.level;
        while self.level < level_cap && self.experience >= self.experience_to_next_level() {
            self.level += 1;
        }
        self.level - start
    }

    /// Removes `fraction` of current experience (truncated) for characters
    /// above level 1. Returns the amount lost.
    pub fn apply_death_penalty(&mut self, fraction: f32) -> u64 {
        if self.level <= CombatConfig::STARTING_LEVEL {
            return 0;
        }
        let penalty = (self.experience as f64 * f64::from(fraction)) as u64;
        self.experience = self.experience.saturating_sub(penalty);
        penalty
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}
