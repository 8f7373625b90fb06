//! Monte Carlo localization filter.
//!
//! Owns the particle population, the ground-truth robot, the iteration
//! counter, and the sticky localization flag, and drives one full filter
//! cycle per external tick. The cycle is pure state evolution: rendering and
//! input are downstream consumers of the read-only views.

use serde::Deserialize;
use thiserror::Error;

use crate::core::math::population_variance;
use crate::core::types::{Particle, Pose};
use crate::map::ObstacleMap;

use super::likelihood;
use super::motion_model::{self, MotionOutcome};
use super::random::{RandomSource, SeededRng};
use super::resampler;
use super::sensor_model;

/// Smallest supported population size.
pub const MIN_PARTICLES: usize = 100;

/// Largest supported population size.
pub const MAX_PARTICLES: usize = 50_000;

/// Filter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Number of particles, in `[MIN_PARTICLES, MAX_PARTICLES]`.
    pub particle_count: usize,

    /// Distance every particle and the robot travel each cycle, map units.
    pub step_distance: f64,

    /// Noise standard deviation of the likelihood model.
    pub noise_sigma: f64,

    /// Maximum sonar range, map units.
    pub max_range: f64,

    /// Additive Gaussian noise on the robot's sonar readings. `None` keeps
    /// the robot reading identical to the deterministic ray cast used for
    /// particle expectations.
    pub sensor_noise: Option<f64>,

    /// Position-variance threshold below which the population counts as
    /// localized, in squared map units.
    pub convergence_threshold: f64,

    /// Cap on heading redraws when a move is blocked.
    pub max_heading_retries: usize,

    /// Seed for the filter's random source.
    pub seed: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            particle_count: 2000,
            step_distance: 1.0,
            noise_sigma: likelihood::DEFAULT_SIGMA,
            max_range: 300.0,
            sensor_noise: None,
            convergence_threshold: 100.0,
            max_heading_retries: motion_model::DEFAULT_MAX_RETRIES,
            seed: 12345,
        }
    }
}

/// Filter construction errors.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("particle count {0} outside supported range [{MIN_PARTICLES}, {MAX_PARTICLES}]")]
    InvalidParticleCount(usize),

    #[error("map has no free cells to place particles on")]
    NoFreeSpace,

    #[error("robot start pose ({x:.1}, {y:.1}) is out of bounds or blocked")]
    BlockedRobotPose { x: f64, y: f64 },
}

/// Per-cycle diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    /// Iteration counter after this cycle's advance.
    pub iterations: u64,
    /// Population variance of x after resampling.
    pub variance_x: f64,
    /// Population variance of y after resampling.
    pub variance_y: f64,
    /// Number of exploration relocations performed.
    pub relocated: usize,
    /// Whether the robot failed to find a collision-free heading.
    pub robot_blocked: bool,
    /// Whether this cycle tripped the localization flag.
    pub just_localized: bool,
}

/// Monte Carlo localization filter.
#[derive(Debug)]
pub struct MclFilter {
    config: FilterConfig,
    particles: Vec<Particle>,
    robot: Particle,
    iterations: u64,
    localized: bool,
    rng: SeededRng,
    stats: CycleStats,
}

impl MclFilter {
    /// Create a filter with the robot placed at a random free pose.
    pub fn new<M: ObstacleMap + ?Sized>(
        config: FilterConfig,
        map: &M,
    ) -> Result<Self, FilterError> {
        Self::validate(&config, map)?;
        let mut rng = SeededRng::from_seed(config.seed);
        let robot_pose = resampler::place_random(map, &mut rng);
        Ok(Self::build(config, map, robot_pose, rng))
    }

    /// Create a filter with an explicit robot start pose.
    pub fn with_robot<M: ObstacleMap + ?Sized>(
        config: FilterConfig,
        map: &M,
        robot_pose: Pose,
    ) -> Result<Self, FilterError> {
        Self::validate(&config, map)?;
        if !map.in_bounds(robot_pose.x, robot_pose.y)
            || map.is_obstacle(robot_pose.x, robot_pose.y)
        {
            return Err(FilterError::BlockedRobotPose {
                x: robot_pose.x,
                y: robot_pose.y,
            });
        }
        let rng = SeededRng::from_seed(config.seed);
        Ok(Self::build(config, map, robot_pose, rng))
    }

    fn validate<M: ObstacleMap + ?Sized>(
        config: &FilterConfig,
        map: &M,
    ) -> Result<(), FilterError> {
        if !(MIN_PARTICLES..=MAX_PARTICLES).contains(&config.particle_count) {
            return Err(FilterError::InvalidParticleCount(config.particle_count));
        }
        if !map.has_free_cell() {
            return Err(FilterError::NoFreeSpace);
        }
        Ok(())
    }

    fn build<M: ObstacleMap + ?Sized>(
        config: FilterConfig,
        map: &M,
        robot_pose: Pose,
        mut rng: SeededRng,
    ) -> Self {
        let mut robot = Particle::with_weight(robot_pose, 1.0);
        robot.scan = match config.sensor_noise {
            Some(sigma) => {
                sensor_model::measure_noisy(&robot.pose, map, config.max_range, sigma, &mut rng)
            }
            None => sensor_model::measure(&robot.pose, map, config.max_range),
        };

        let particles = Self::spawn_population(config.particle_count, map, &mut rng);

        Self {
            config,
            particles,
            robot,
            iterations: 1,
            localized: false,
            rng,
            stats: CycleStats::default(),
        }
    }

    fn spawn_population<M, R>(count: usize, map: &M, rng: &mut R) -> Vec<Particle>
    where
        M: ObstacleMap + ?Sized,
        R: RandomSource + ?Sized,
    {
        let uniform = 1.0 / count as f64;
        (0..count)
            .map(|_| Particle::with_weight(resampler::place_random(map, rng), uniform))
            .collect()
    }

    /// Run one full filter cycle.
    ///
    /// Sequence: advance the iteration counter; move and re-measure every
    /// particle; move the robot identically and take its sonar reading;
    /// weight particles by measurement likelihood; normalize; resample with
    /// exploration injection (the population handle is swapped once); then
    /// evaluate convergence on the new population.
    pub fn advance_cycle<M: ObstacleMap + ?Sized>(&mut self, map: &M) {
        let step = self.config.step_distance;
        let retries = self.config.max_heading_retries;
        let max_range = self.config.max_range;

        self.iterations += (self.config.particle_count / 1000) as u64;
        let mut stats = CycleStats {
            iterations: self.iterations,
            ..Default::default()
        };

        for p in self.particles.iter_mut() {
            motion_model::advance(&mut p.pose, step, map, &mut self.rng, retries);
            p.scan = sensor_model::measure(&p.pose, map, max_range);
        }

        let outcome = motion_model::advance(&mut self.robot.pose, step, map, &mut self.rng, retries);
        stats.robot_blocked = outcome == MotionOutcome::Blocked;

        self.robot.scan = match self.config.sensor_noise {
            Some(sigma) => sensor_model::measure_noisy(
                &self.robot.pose,
                map,
                max_range,
                sigma,
                &mut self.rng,
            ),
            None => sensor_model::measure(&self.robot.pose, map, max_range),
        };

        let log_weights: Vec<f64> = self
            .particles
            .iter()
            .map(|p| likelihood::log_likelihood(&p.scan, &self.robot.scan, self.config.noise_sigma))
            .collect();
        likelihood::normalize(&mut self.particles, &log_weights);

        let mut next = resampler::resample(&self.particles, &mut self.rng);
        stats.relocated =
            resampler::inject_random_particles(&mut next, map, self.iterations, &mut self.rng);
        self.particles = next;

        let xs: Vec<f64> = self.particles.iter().map(|p| p.pose.x).collect();
        let ys: Vec<f64> = self.particles.iter().map(|p| p.pose.y).collect();
        let (_, variance_x) = population_variance(&xs);
        let (_, variance_y) = population_variance(&ys);
        stats.variance_x = variance_x;
        stats.variance_y = variance_y;

        let threshold = self.config.convergence_threshold;
        if !self.localized && variance_x < threshold && variance_y < threshold {
            self.localized = true;
            stats.just_localized = true;
            log::info!(
                "localized at iteration {} (var_x={:.1}, var_y={:.1})",
                self.iterations,
                variance_x,
                variance_y
            );
        }

        log::debug!(
            "iteration {}: var=({:.1}, {:.1}), relocated {}",
            self.iterations,
            variance_x,
            variance_y,
            stats.relocated
        );
        self.stats = stats;
    }

    /// Discard the population and spawn a fresh uniformly-weighted one.
    ///
    /// The robot pose and the iteration counter are untouched; the
    /// localization flag never reverts.
    pub fn reset_population<M: ObstacleMap + ?Sized>(&mut self, map: &M) {
        self.particles = Self::spawn_population(self.config.particle_count, map, &mut self.rng);
        self.stats = CycleStats::default();
    }

    /// The configuration the filter was built with.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Read-only view of the current population.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The ground-truth robot (pose and latest sonar reading).
    pub fn robot(&self) -> &Particle {
        &self.robot
    }

    /// Whether the population has converged on a pose. Sticky: once set it
    /// never reverts within a run.
    pub fn is_localized(&self) -> bool {
        self.localized
    }

    /// Current iteration counter.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Diagnostics from the most recent cycle.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// The highest-weight particle.
    pub fn best_particle(&self) -> &Particle {
        self.particles
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
            .expect("population is never empty")
    }

    /// Weighted mean pose of the population, with a circular mean heading.
    pub fn estimate(&self) -> Pose {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_sin = 0.0;
        let mut sum_cos = 0.0;
        let mut total_weight = 0.0;

        for p in &self.particles {
            let rad = p.pose.theta.to_radians();
            sum_x += p.weight * p.pose.x;
            sum_y += p.weight * p.pose.y;
            sum_sin += p.weight * rad.sin();
            sum_cos += p.weight * rad.cos();
            total_weight += p.weight;
        }

        if total_weight > 1e-12 {
            Pose::new(
                sum_x / total_weight,
                sum_y / total_weight,
                sum_sin.atan2(sum_cos).to_degrees(),
            )
        } else {
            let n = self.particles.len() as f64;
            let mean_x = self.particles.iter().map(|p| p.pose.x).sum::<f64>() / n;
            let mean_y = self.particles.iter().map(|p| p.pose.y).sum::<f64>() / n;
            Pose::new(mean_x, mean_y, 0.0)
        }
    }
}
