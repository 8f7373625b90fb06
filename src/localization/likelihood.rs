//! Gaussian measurement likelihood and population weight normalization.
//!
//! Each sonar channel is treated as an independent Gaussian observation, so
//! a particle's likelihood is the product of 16 per-channel densities. The
//! product underflows to exactly zero under large aggregate error; the
//! population-level normalization therefore works in log domain, shifting by
//! the maximum log weight before exponentiating, which preserves the ranking
//! of particles that the plain product would collapse.

use crate::core::types::{Particle, SonarScan};

/// Noise standard deviation of the baseline sonar pairing.
pub const DEFAULT_SIGMA: f64 = 20.0;

/// Log-likelihood of observing `observed` when `expected` is the true sweep.
///
/// Sum over channels of `ln g_i` with
/// `g_i = (1 / (sqrt(2 pi) sigma)) * exp(-e_i^2 / (2 sigma^2))`.
pub fn log_likelihood(expected: &SonarScan, observed: &SonarScan, sigma: f64) -> f64 {
    debug_assert!(sigma > 0.0);
    let log_norm = ((2.0 * std::f64::consts::PI).sqrt() * sigma).ln();
    let inv_two_var = 1.0 / (2.0 * sigma * sigma);
    expected
        .iter()
        .zip(observed)
        .map(|(e, o)| {
            let err = e - o;
            -log_norm - err * err * inv_two_var
        })
        .sum()
}

/// Likelihood of a particle's sweep against the robot's sweep.
///
/// Maximal when every channel matches, strictly decreasing in each channel's
/// absolute error, and may underflow to exactly 0 under large aggregate
/// error; callers must tolerate a zero result.
pub fn likelihood(expected: &SonarScan, observed: &SonarScan, sigma: f64) -> f64 {
    log_likelihood(expected, observed, sigma).exp()
}

/// Turn per-particle log weights into normalized belief weights.
///
/// If no log weight is finite the population is degenerate and every weight
/// is reset to the uniform `1/N`. Both outcomes leave the weights summing
/// to 1.
pub fn normalize(particles: &mut [Particle], log_weights: &[f64]) {
    debug_assert_eq!(particles.len(), log_weights.len());
    let n = particles.len();
    if n == 0 {
        return;
    }

    let max = log_weights
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        log::debug!("all particle weights degenerate; resetting to uniform");
        let uniform = 1.0 / n as f64;
        for p in particles {
            p.weight = uniform;
        }
        return;
    }

    let sum: f64 = log_weights.iter().map(|&lw| (lw - max).exp()).sum();
    for (p, &lw) in particles.iter_mut().zip(log_weights) {
        p.weight = (lw - max).exp() / sum;
    }
}
