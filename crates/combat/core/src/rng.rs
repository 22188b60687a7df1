//! Deterministic randomness for critical rolls.
//!
//! Rolls are a pure function of a seed. The spell engine derives one seed per
//! (cast, target) from the configured base seed, a monotonically increasing
//! cast counter and the target id, so replaying the same casts in the same
//! order reproduces every critical hit.

/// Seeded random source.
pub trait RngOracle: Send + Sync {
    /// Produces a uniformly distributed `u32` for `seed`.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform percentage roll in `[0, 100)` with 0.01 resolution.
    fn roll_percent(&self, seed: u64) -> f32 {
        (self.next_u32(seed) % 10_000) as f32 / 100.0
    }

    /// Uniform index in `[0, len)`; `len == 0` yields 0.
    fn pick(&self, seed: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_u32(seed) as usize % len
    }
}

/// Single-step PCG-XSH-RR: one LCG advance followed by the xorshift/rotate
/// output permutation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn advance(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn permute(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rotation = (state >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::permute(Self::advance(seed))
    }
}

/// Roll purposes, mixed into the seed so independent rolls in one cast never
/// share a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollContext {
    Critical = 0,
    SpellChoice = 1,
}

/// Mixes the base seed, cast counter, subject id and roll purpose into one seed.
pub fn compute_seed(base_seed: u64, counter: u64, subject: u32, context: RollContext) -> u64 {
    let mut hash = base_seed;
    hash ^= counter.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(subject).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context as u32).wrapping_mul(0x85ebca6b);

    // murmur3 finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
