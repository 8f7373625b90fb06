//! Pose and particle types for Monte Carlo localization.

use serde::{Deserialize, Serialize};

use crate::core::math::wrap_degrees;

/// Number of range readings in one sonar sweep.
pub const SONAR_BEAMS: usize = 16;

/// Angular spacing between adjacent sonar beams, in degrees.
pub const BEAM_SPACING_DEG: f64 = 360.0 / SONAR_BEAMS as f64;

/// One full sonar sweep: range readings at fixed angular offsets from the
/// pose's heading.
pub type SonarScan = [f64; SONAR_BEAMS];

/// Robot pose: position in map units and heading in degrees.
///
/// `theta` is normalized to [0, 360) on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position in map units
    pub x: f64,
    /// Y position in map units
    pub y: f64,
    /// Heading in degrees, normalized to [0, 360)
    pub theta: f64,
}

impl Pose {
    /// Create a new pose with theta normalized to [0, 360).
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: wrap_degrees(theta),
        }
    }

    /// The point reached by travelling `distance` along the current heading.
    #[inline]
    pub fn destination(&self, distance: f64) -> (f64, f64) {
        let (sin_t, cos_t) = self.theta.to_radians().sin_cos();
        (self.x + distance * cos_t, self.y + distance * sin_t)
    }
}

/// A weighted pose hypothesis.
///
/// `scan` holds the ranges this particle would measure from its pose; it is
/// recomputed every cycle after the particle moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Hypothesized robot pose.
    pub pose: Pose,
    /// Expected sonar sweep from `pose`.
    pub scan: SonarScan,
    /// Belief weight (normalized to sum to 1 across the population).
    pub weight: f64,
}

impl Particle {
    /// Create a particle with an empty scan and the given weight.
    pub fn with_weight(pose: Pose, weight: f64) -> Self {
        Self {
            pose,
            scan: [0.0; SONAR_BEAMS],
            weight,
        }
    }
}
