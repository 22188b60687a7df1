//! Health and resource ledger.
//!
//! Both pools are bounded counters clamped to `[0, max]`. Health reaching
//! zero moves the ledger from [`LifeState::Alive`] to [`LifeState::Dead`];
//! the transition happens once and is terminal, so every later damage or
//! heal is a no-op and callers can rely on seeing exactly one killing blow.

use crate::stats::ResourceMaximums;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// Result of one [`Vitals::take_damage`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageOutcome {
    /// The target was already dead; nothing changed.
    Ignored,
    /// Health dropped but stayed above zero.
    Wounded { dealt: i32, remaining: i32 },
    /// This call took health to zero and performed the death transition.
    Killed { dealt: i32 },
}

impl DamageOutcome {
    /// Health actually removed by the call.
    pub const fn dealt(&self) -> i32 {
        match self {
            Self::Ignored => 0,
            Self::Wounded { dealt, .. } | Self::Killed { dealt } => *dealt,
        }
    }

    pub const fn is_killing_blow(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    health: i32,
    health_max: i32,
    resource: i32,
    resource_max: i32,
    state: LifeState,
}

impl Vitals {
    /// Creates a full ledger.
    pub fn new(maximums: ResourceMaximums) -> Self {
        let health_max = maximums.health.max(1);
        let resource_max = maximums.resource.max(0);
        Self {
            health: health_max,
            health_max,
            resource: resource_max,
            resource_max,
            state: LifeState::Alive,
        }
    }

    pub const fn health(&self) -> i32 {
        self.health
    }

    pub const fn health_max(&self) -> i32 {
        self.health_max
    }

    pub const fn resource(&self) -> i32 {
        self.resource
    }

    pub const fn resource_max(&self) -> i32 {
        self.resource_max
    }

    pub const fn state(&self) -> LifeState {
        self.state
    }

    pub const fn is_dead(&self) -> bool {
        matches!(self.state, LifeState::Dead)
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }

        let before = self.health;
        self.health = self.health.saturating_sub(amount.max(0)).max(0);
        let dealt = before - self.health;

        if self.health == 0 {
            self.state = LifeState::Dead;
            DamageOutcome::Killed { dealt }
        } else {
            DamageOutcome::Wounded {
                dealt,
                remaining: self.health,
            }
        }
    }

    /// Adds health up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.is_dead() {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount.max(0)).min(self.health_max);
        self.health - before
    }

    /// Spends `amount` resource. Fails without mutation when the pool is short.
    pub fn consume_resource(&mut self, amount: i32) -> bool {
        let amount = amount.max(0);
        if self.resource < amount {
            return false;
        }
        self.resource -= amount;
        true
    }

    /// Adds resource up to the maximum. Returns the amount actually restored.
    pub fn restore_resource(&mut self, amount: i32) -> i32 {
        let before = self.resource;
        self.resource = self.resource.saturating_add(amount.max(0)).min(self.resource_max);
        self.resource - before
    }

    /// Applies new maximums after a stat recompute, clamping current values.
    pub fn set_maximums(&mut self, maximums: ResourceMaximums) {
        self.health_max = maximums.health.max(1);
        self.resource_max = maximums.resource.max(0);
        self.health = self.health.min(self.health_max);
        self.resource = self.resource.min(self.resource_max);
    }

    /// Refills both pools. Has no effect on the dead.
    pub fn refill(&mut self) {
        if self.is_dead() {
            return;
        }
        self.health = self.health_max;
        self.resource = self.resource_max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals(health: i32, resource: i32) -> Vitals {
        Vitals::new(ResourceMaximums { health, resource })
    }

    #[test]
    fn damage_clamps_at_zero_and_kills_once() {
        let mut v = vitals(50, 10);

        assert_eq!(
            v.take_damage(20),
            DamageOutcome::Wounded {
                dealt: 20,
                remaining: 30
            }
        );
        assert_eq!(v.take_damage(100), DamageOutcome::Killed { dealt: 30 });
        assert_eq!(v.health(), 0);
        assert!(v.is_dead());

        assert_eq!(v.take_damage(5), DamageOutcome::Ignored);
        assert_eq!(v.health(), 0);
    }

    #[test]
    fn heal_clamps_and_ignores_dead() {
        let mut v = vitals(50, 10);
        v.take_damage(10);

        assert_eq!(v.heal(25), 10);
        assert_eq!(v.health(), 50);

        v.take_damage(50);
        assert_eq!(v.heal(25), 0);
        assert_eq!(v.health(), 0);
    }

    #[test]
    fn huge_restores_saturate_at_maximum() {
        let mut v = vitals(50, 10);
        v.take_damage(30);
        assert!(v.consume_resource(4));

        assert_eq!(v.heal(i32::MAX), 30);
        assert_eq!(v.health(), 50);
        assert_eq!(v.restore_resource(i32::MAX), 4);
        assert_eq!(v.resource(), 10);

        assert_eq!(v.take_damage(i32::MAX), DamageOutcome::Killed { dealt: 50 });
    }

    #[test]
    fn consume_resource_is_all_or_nothing() {
        let mut v = vitals(50, 10);

        assert!(!v.consume_resource(11));
        assert_eq!(v.resource(), 10);

        assert!(v.consume_resource(10));
        assert_eq!(v.resource(), 0);

        assert_eq!(v.restore_resource(25), 10);
        assert_eq!(v.resource(), 10);
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut v = vitals(50, 10);
        v.take_damage(-10);
        v.heal(-10);
        assert!(v.consume_resource(-3));
        assert_eq!((v.health(), v.resource()), (50, 10));
    }

    #[test]
    fn shrinking_maximums_clamp_current() {
        let mut v = vitals(100, 40);
        v.set_maximums(ResourceMaximums {
            health: 60,
            resource: 20,
        });
        assert_eq!((v.health(), v.resource()), (60, 20));

        v.set_maximums(ResourceMaximums {
            health: 120,
            resource: 40,
        });
        assert_eq!((v.health(), v.resource()), (60, 20));
        v.refill();
        assert_eq!((v.health(), v.resource()), (120, 40));
    }
}
