//! disha-mcl - Monte Carlo localization for a sonar robot on a known map.
//!
//! A simulated robot wakes up at an unknown pose on a known occupancy map
//! and localizes itself with a particle filter: a population of weighted
//! pose hypotheses is moved, scored against the robot's sonar sweep, and
//! resampled each cycle until its position variance collapses.
//!
//! # Architecture
//!
//! The crate is organized into 3 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 localization/                       │  ← Filter core
//! │   (motion, sensor, likelihood, resampler, filter)   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     map/                            │  ← Obstacle surface
//! │              (grid, PPM decoding)                   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                 (types, math)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The filter sees the map only through the [`map::ObstacleMap`] trait and
//! draws all randomness from one seedable [`localization::RandomSource`], so
//! runs with the same seed replay bit-identically. Rendering and input are
//! downstream consumers of the filter's read-only views; the crate performs
//! no display work.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Obstacle surface (depends on core)
// ============================================================================
pub mod map;

// ============================================================================
// Layer 3: Localization filter (depends on core, map)
// ============================================================================
pub mod localization;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::types::{Particle, Pose, SonarScan, BEAM_SPACING_DEG, SONAR_BEAMS};

// Map
pub use crate::map::{GridMap, MapError, ObstacleMap};

// Localization
pub use crate::localization::{
    CycleStats, FilterConfig, FilterError, MclFilter, MotionOutcome, RandomSource, SeededRng,
    MAX_PARTICLES, MIN_PARTICLES,
};
