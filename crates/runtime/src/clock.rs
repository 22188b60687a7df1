//! Fixed-step simulation clock.
//!
//! Hosts feed wall-clock deltas of any size; the clock releases them as a
//! whole number of fixed steps and carries the remainder to the next call.
//! The combat core therefore always ticks with the same `dt`, which keeps
//! periodic effects and projectile travel reproducible.

use tracing::debug;

use crate::api::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq)]
pub struct FixedStepClock {
    step: f32,
    accumulator: f32,
    max_steps: u32,
    frames: u64,
}

impl FixedStepClock {
    pub const DEFAULT_STEP: f32 = 1.0 / 30.0;
    /// Steps released per `advance` before the backlog is dropped.
    pub const DEFAULT_MAX_STEPS: u32 = 8;
    // Absorbs rounding so that e.g. 0.3 s at 0.1 s/step yields three steps.
    const EPSILON: f32 = 1e-5;

    pub fn new(step: f32) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(RuntimeError::InvalidStep(step));
        }
        Ok(Self {
            step,
            accumulator: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
            frames: 0,
        })
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Steps released so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds released so far.
    pub fn elapsed(&self) -> f64 {
        self.frames as f64 * f64::from(self.step)
    }

    /// Adds `delta` seconds and returns how many steps to simulate now.
    pub fn advance(&mut self, delta: f32) -> u32 {
        if delta.is_finite() && delta > 0.0 {
            self.accumulator += delta;
        }

        let mut steps = 0;
        while self.accumulator + Self::EPSILON >= self.step {
            if steps == self.max_steps {
                debug!(
                    target: "runtime::clock",
                    backlog = self.accumulator,
                    "dropping simulation backlog"
                );
                self.accumulator = 0.0;
                break;
            }
            self.accumulator = (self.accumulator - self.step).max(0.0);
            steps += 1;
        }
        self.frames += u64::from(steps);
        steps
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self {
            step: Self::DEFAULT_STEP,
            accumulator: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
            frames: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_whole_steps_and_carries_remainder() {
        let mut clock = FixedStepClock::new(0.1).unwrap();
        assert_eq!(clock.advance(0.05), 0);
        assert_eq!(clock.advance(0.05), 1);
        assert_eq!(clock.advance(0.3), 3);
        assert_eq!(clock.frames(), 4);
        assert!((clock.elapsed() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn caps_the_backlog() {
        let mut clock = FixedStepClock::new(0.1).unwrap().with_max_steps(2);
        assert_eq!(clock.advance(10.0), 2);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn rejects_bad_steps_and_deltas() {
        assert!(matches!(
            FixedStepClock::new(0.0),
            Err(RuntimeError::InvalidStep(_))
        ));
        assert!(FixedStepClock::new(f32::NAN).is_err());

        let mut clock = FixedStepClock::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
    }
}
