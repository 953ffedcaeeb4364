//! Deterministic RNG for the simulation.
//!
//! One seeded generator per iteration, owned by the Player. Two runs with
//! the same seed and the same inputs consume the stream identically and
//! produce identical event traces.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct SimRng {
    rng: SmallRng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Re-seed in place. Called once per iteration with the base seed plus
    /// the iteration index so iterations stay independent.
    pub fn seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Uniform integer in `[lo, hi]`, both ends inclusive.
    pub fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform float in `[lo, hi)`.
    pub fn uniform_range(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// True when a uniform draw in `[0, 100)` lands strictly below
    /// `percent`. A chance of 100 always succeeds, 0 never does.
    pub fn roll_chance(&mut self, percent: f64) -> bool {
        self.rng.gen_range(0.0..100.0) < percent
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng")
    }
}
