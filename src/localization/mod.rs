//! Monte Carlo localization.
//!
//! A population of weighted pose hypotheses is iteratively moved, scored
//! against the robot's sonar reading, and resampled toward the true pose.
//!
//! # Components
//!
//! - [`motion_model`]: heading-aligned motion with wall-collision retry
//! - [`sensor_model`]: 16-beam sonar sweep via ray casting
//! - [`likelihood`]: Gaussian measurement likelihood and weight normalization
//! - [`resampler`]: multinomial resampling with exploration injection
//! - [`MclFilter`]: the full filter cycle and convergence tracking
//!
//! # Example
//!
//! ```
//! use disha_mcl::localization::{FilterConfig, MclFilter};
//! use disha_mcl::map::{GridMap, ObstacleMap};
//!
//! let map = GridMap::from_rows(&[
//!     "##########",
//!     "#........#",
//!     "#........#",
//!     "##########",
//! ]);
//! let config = FilterConfig {
//!     particle_count: 100,
//!     max_range: 20.0,
//!     ..Default::default()
//! };
//! let mut filter = MclFilter::new(config, &map).unwrap();
//!
//! filter.advance_cycle(&map);
//!
//! let estimate = filter.estimate();
//! assert!(map.in_bounds(estimate.x, estimate.y));
//! ```

pub mod likelihood;
pub mod motion_model;
pub mod random;
pub mod resampler;
pub mod sensor_model;

mod filter;

pub use filter::{
    CycleStats, FilterConfig, FilterError, MclFilter, MAX_PARTICLES, MIN_PARTICLES,
};
pub use motion_model::MotionOutcome;
pub use random::{RandomSource, SeededRng};
