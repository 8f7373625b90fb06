//! Multinomial resampling and exploration-particle injection.
//!
//! Resampling draws a fresh fixed-size population from the current belief:
//! every draw is independent, so a particle's expected share of the new
//! population equals its normalized weight. Afterwards a decaying fraction
//! of the population is scattered to fresh random poses to counter particle
//! deprivation (the population collapsing onto a single, possibly wrong,
//! mode before the robot has seen enough of the map).

use crate::core::types::{Particle, Pose};
use crate::map::ObstacleMap;

use super::random::RandomSource;

/// Base fraction of the population scattered per cycle, at iteration 100.
const EXPLORATION_FRACTION: f64 = 0.05;

/// Draw a new population of the same size, proportional to belief.
///
/// Each draw samples `r ~ Uniform(0, 1)` and walks the population in slice
/// order accumulating weight until the running sum reaches `r`. Only the
/// chosen particle's pose is copied; the new particle starts at uniform
/// weight with an empty scan. If rounding exhausts the slice before the sum
/// reaches `r`, the last particle is selected.
pub fn resample<R: RandomSource + ?Sized>(particles: &[Particle], rng: &mut R) -> Vec<Particle> {
    let n = particles.len();
    if n == 0 {
        return Vec::new();
    }
    let uniform = 1.0 / n as f64;
    let mut next = Vec::with_capacity(n);

    for _ in 0..n {
        let r = rng.uniform();
        let mut cumulative = 0.0;
        let mut chosen = n - 1;
        for (i, p) in particles.iter().enumerate() {
            cumulative += p.weight;
            if cumulative >= r {
                chosen = i;
                break;
            }
        }
        next.push(Particle::with_weight(particles[chosen].pose, uniform));
    }

    next
}

/// Draw a collision-free pose uniformly over the map.
///
/// Position is rejection-sampled until it lands on free space; the heading
/// is then drawn uniformly in [0, 360). Also used for initial placement.
/// Callers must ensure the map has at least one free cell.
pub fn place_random<M, R>(map: &M, rng: &mut R) -> Pose
where
    M: ObstacleMap + ?Sized,
    R: RandomSource + ?Sized,
{
    loop {
        let x = rng.uniform() * map.width() as f64;
        let y = rng.uniform() * map.height() as f64;
        if !map.is_obstacle(x, y) {
            let theta = rng.uniform() * 360.0;
            return Pose::new(x, y, theta);
        }
    }
}

/// Scatter a decaying fraction of the population to fresh random poses.
///
/// Selects `floor(N * 0.05 * (100 / iterations))` slots by uniform index,
/// with replacement (the same slot may be scattered more than once), and
/// relocates each exactly as in initialization. Returns the number of
/// relocation draws performed.
pub fn inject_random_particles<M, R>(
    particles: &mut [Particle],
    map: &M,
    iterations: u64,
    rng: &mut R,
) -> usize
where
    M: ObstacleMap + ?Sized,
    R: RandomSource + ?Sized,
{
    let n = particles.len();
    if n == 0 || iterations == 0 {
        return 0;
    }
    let count =
        (n as f64 * EXPLORATION_FRACTION * (100.0 / iterations as f64)).floor() as usize;

    for _ in 0..count {
        let idx = rng.uniform_int(n);
        particles[idx].pose = place_random(map, rng);
    }

    count
}
