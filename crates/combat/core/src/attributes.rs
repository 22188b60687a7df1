//! Attribute store: the seven primary traits every combatant carries.
//!
//! Values live in a fixed array indexed by [`AttributeKind`], so a lookup can
//! never miss. Every write goes through [`Attributes::set`], which clamps to
//! zero and, only when the stored value actually changes, notifies the
//! registered observers synchronously and reports the change to the caller.

use std::collections::BTreeMap;
use std::fmt;

use strum::EnumCount;

/// Primary attribute kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttributeKind {
    /// Luck; feeds magic find.
    Fortuity,
    /// Raw offensive power; feeds physical and magical damage.
    Offense,
    /// Toughness; feeds max health and damage reduction.
    Resilience,
    /// Staying power; feeds max resource.
    Tenacity,
    Utility,
    Negotiation,
    /// Precision; feeds critical chance, critical damage and attack speed.
    Expertise,
}

impl AttributeKind {
    pub const ALL: [Self; Self::COUNT] = [
        Self::Fortuity,
        Self::Offense,
        Self::Resilience,
        Self::Tenacity,
        Self::Utility,
        Self::Negotiation,
        Self::Expertise,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Additive attribute deltas keyed by kind (class bases, subclass bonuses).
pub type AttributeModifiers = BTreeMap<AttributeKind, i32>;

/// Record of one effective attribute write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeChange {
    pub kind: AttributeKind,
    pub old: i32,
    pub new: i32,
}

/// Callback invoked synchronously for every effective attribute change.
pub type AttributeObserver = Box<dyn FnMut(&AttributeChange) + Send>;

/// Per-entity attribute values plus their change observers.
///
/// Cloning copies the values only; observers stay with the original.
#[derive(Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    values: [i32; AttributeKind::COUNT],
    #[cfg_attr(feature = "serde", serde(skip))]
    observers: Vec<AttributeObserver>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store with every attribute at `value`.
    pub fn uniform(value: i32) -> Self {
        Self {
            values: [value.max(0); AttributeKind::COUNT],
            observers: Vec::new(),
        }
    }

    #[inline]
    pub fn get(&self, kind: AttributeKind) -> i32 {
        self.values[kind.index()]
    }

    /// Writes `value` (clamped to zero).
    ///
    /// Returns the change when the stored value differs from the previous
    /// one; observers are notified before this returns.
    pub fn set(&mut self, kind: AttributeKind, value: i32) -> Option<AttributeChange> {
        let new = value.max(0);
        let old = self.values[kind.index()];
        if old == new {
            return None;
        }

        self.values[kind.index()] = new;
        let change = AttributeChange { kind, old, new };
        for observer in &mut self.observers {
            observer(&change);
        }
        Some(change)
    }

    pub fn modify(&mut self, kind: AttributeKind, delta: i32) -> Option<AttributeChange> {
        self.set(kind, self.get(kind).saturating_add(delta))
    }

    /// Applies each delta through [`Self::modify`].
    ///
    /// Addition commutes, so the iteration order of `modifiers` does not
    /// affect the final values as long as no intermediate write clamps.
    pub fn apply_modifiers<I>(&mut self, modifiers: I) -> Vec<AttributeChange>
    where
        I: IntoIterator<Item = (AttributeKind, i32)>,
    {
        modifiers
            .into_iter()
            .filter_map(|(kind, delta)| self.modify(kind, delta))
            .collect()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&AttributeChange) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, i32)> + '_ {
        AttributeKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }
}

impl Clone for Attributes {
    fn clone(&self) -> Self {
        Self {
            values: self.values,
            observers: Vec::new(),
        }
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Attributes {}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(AttributeKind, i32)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (AttributeKind, i32)>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for (kind, value) in iter {
            attributes.values[kind.index()] = value.max(0);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn missing_kinds_read_as_zero() {
        let attributes = Attributes::new();
        for kind in AttributeKind::ALL {
            assert_eq!(attributes.get(kind), 0);
        }
    }

    #[test]
    fn set_clamps_and_reports_changes() {
        let mut attributes = Attributes::new();

        let change = attributes.set(AttributeKind::Offense, -4);
        assert_eq!(change, None, "clamping to the current value is not a change");

        let change = attributes.set(AttributeKind::Offense, 7);
        assert_eq!(
            change,
            Some(AttributeChange {
                kind: AttributeKind::Offense,
                old: 0,
                new: 7,
            })
        );
        assert_eq!(attributes.set(AttributeKind::Offense, 7), None);
    }

    #[test]
    fn observers_fire_only_on_effective_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut attributes = Attributes::new();
        attributes.subscribe(move |change| sink.lock().unwrap().push(*change));

        attributes.set(AttributeKind::Tenacity, 3);
        attributes.set(AttributeKind::Tenacity, 3);
        attributes.modify(AttributeKind::Tenacity, -10);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].old, seen[0].new), (0, 3));
        assert_eq!((seen[1].old, seen[1].new), (3, 0));
    }

    #[test]
    fn modify_round_trip_restores_value() {
        for kind in AttributeKind::ALL {
            for start in [0, 1, 5, 40] {
                for delta in [0, 1, 3, 17] {
                    let mut attributes = Attributes::new();
                    attributes.set(kind, start);

                    attributes.modify(kind, delta);
                    attributes.modify(kind, -delta);
                    assert_eq!(attributes.get(kind), start);
                }
            }
        }
    }

    #[test]
    fn modify_round_trip_cannot_go_below_floor() {
        let mut attributes = Attributes::new();
        attributes.set(AttributeKind::Utility, 2);

        attributes.modify(AttributeKind::Utility, -5);
        assert_eq!(attributes.get(AttributeKind::Utility), 0);
        attributes.modify(AttributeKind::Utility, 5);
        assert_eq!(attributes.get(AttributeKind::Utility), 5);
    }

    #[test]
    fn apply_modifiers_is_order_independent() {
        let forward = [
            (AttributeKind::Offense, 3),
            (AttributeKind::Resilience, 2),
            (AttributeKind::Offense, -1),
        ];
        let mut reversed = forward;
        reversed.reverse();

        let mut a = Attributes::uniform(5);
        let mut b = Attributes::uniform(5);
        a.apply_modifiers(forward);
        b.apply_modifiers(reversed);

        assert_eq!(a, b);
        assert_eq!(a.get(AttributeKind::Offense), 7);
    }

    #[test]
    fn clone_copies_values_but_not_observers() {
        let mut attributes = Attributes::uniform(5);
        attributes.subscribe(|_| {});

        let copy = attributes.clone();
        assert_eq!(copy, attributes);
        assert_eq!(copy.observer_count(), 0);
        assert_eq!(attributes.observer_count(), 1);
    }

    #[test]
    fn kind_names_parse_case_insensitively() {
        use std::str::FromStr;

        assert_eq!(
            AttributeKind::from_str("EXPERTISE").unwrap(),
            AttributeKind::Expertise
        );
        assert_eq!(AttributeKind::Negotiation.to_string(), "negotiation");
    }
}
