//! Randomness injection for the localization core.
//!
//! Every stochastic step (particle placement, heading redraws, resampling,
//! exploration injection, optional sensor noise) draws from one seedable
//! source, so two runs constructed with the same seed replay exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness (abstracted for testing).
pub trait RandomSource {
    /// Uniform real in [0, 1).
    fn uniform(&mut self) -> f64;

    /// Uniform integer in [0, bound). `bound` must be non-zero.
    fn uniform_int(&mut self, bound: usize) -> usize;

    /// Standard normal deviate, derived from `uniform` via Box-Muller.
    fn standard_normal(&mut self) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// Default source backed by `rand`'s `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: StdRng,
}

impl SeededRng {
    /// Create a source from an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn uniform(&mut self) -> f64 {
        self.rng.gen()
    }

    fn uniform_int(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}
