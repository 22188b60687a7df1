//! Per-(caster, spell) cooldown timers.
//!
//! An entry exists only while a cooldown is running: `tick` deletes entries
//! as soon as they reach zero, and `remaining` reports 0 for absent keys.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::ids::{EntityId, SpellId};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownKey {
    pub caster: EntityId,
    pub spell: SpellId,
}

impl CooldownKey {
    pub fn new(caster: EntityId, spell: impl Into<SpellId>) -> Self {
        Self {
            caster,
            spell: spell.into(),
        }
    }
}

impl fmt::Display for CooldownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.caster.0, self.spell)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CooldownTracker {
    entries: BTreeMap<CooldownKey, f32>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) a cooldown. Non-positive durations clear the key.
    pub fn set(&mut self, key: CooldownKey, seconds: f32) {
        if seconds > 0.0 {
            self.entries.insert(key, seconds);
        } else {
            self.entries.remove(&key);
        }
    }

    /// Seconds left, or 0 when the key is not cooling down.
    pub fn remaining(&self, key: &CooldownKey) -> f32 {
        self.entries.get(key).copied().unwrap_or(0.0)
    }

    pub fn is_ready(&self, key: &CooldownKey) -> bool {
        self.remaining(key) <= 0.0
    }

    /// Advances every timer and prunes the ones that finished.
    pub fn tick(&mut self, delta: f32) {
        self.entries.retain(|key, remaining| {
            *remaining -= delta;
            let running = *remaining > 0.0;
            if !running {
                trace!(target: "combat::cooldown", %key, "cooldown finished");
            }
            running
        });
    }

    /// Makes one spell available immediately. Returns whether it was cooling down.
    pub fn reset(&mut self, key: &CooldownKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Clears every cooldown owned by `caster`. Returns how many were cleared.
    pub fn reset_caster(&mut self, caster: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.caster != caster);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CooldownKey, f32)> {
        self.entries.iter().map(|(key, remaining)| (key, *remaining))
    }
}

impl FromIterator<(CooldownKey, f32)> for CooldownTracker {
    fn from_iter<T: IntoIterator<Item = (CooldownKey, f32)>>(iter: T) -> Self {
        let mut tracker = Self::new();
        for (key, seconds) in iter {
            tracker.set(key, seconds);
        }
        tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(caster: u32, spell: &str) -> CooldownKey {
        CooldownKey::new(EntityId(caster), spell)
    }

    #[test]
    fn counts_down_and_prunes_at_zero() {
        let mut tracker = CooldownTracker::new();
        let punch = key(1, "Heavy Punch");
        tracker.set(punch.clone(), 5.0);

        for _ in 0..4 {
            tracker.tick(1.0);
        }
        assert_eq!(tracker.remaining(&punch), 1.0);
        assert_eq!(tracker.len(), 1);

        tracker.tick(1.0);
        assert_eq!(tracker.remaining(&punch), 0.0);
        assert!(tracker.is_empty(), "finished entries are deleted, not kept at zero");
    }

    #[test]
    fn absent_keys_are_ready() {
        let tracker = CooldownTracker::new();
        assert_eq!(tracker.remaining(&key(1, "Block")), 0.0);
        assert!(tracker.is_ready(&key(1, "Block")));
    }

    #[test]
    fn reset_removes_one_entry() {
        let mut tracker = CooldownTracker::new();
        tracker.set(key(1, "Block"), 3.0);
        tracker.set(key(1, "Heavy Punch"), 3.0);

        assert!(tracker.reset(&key(1, "Block")));
        assert!(!tracker.reset(&key(1, "Block")));
        assert!(tracker.is_ready(&key(1, "Block")));
        assert!(!tracker.is_ready(&key(1, "Heavy Punch")));
    }

    #[test]
    fn reset_caster_leaves_other_casters() {
        let mut tracker = CooldownTracker::new();
        tracker.set(key(1, "Block"), 3.0);
        tracker.set(key(1, "Heavy Punch"), 3.0);
        tracker.set(key(2, "Block"), 3.0);

        assert_eq!(tracker.reset_caster(EntityId(1)), 2);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.remaining(&key(2, "Block")), 3.0);
    }

    #[test]
    fn keys_are_per_caster() {
        assert_ne!(key(1, "Block"), key(2, "Block"));
        assert_eq!(key(12, "Quick Shot").to_string(), "12_Quick Shot");
    }
}
