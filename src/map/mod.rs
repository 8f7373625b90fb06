//! Occupancy surface: the obstacle map the filter localizes against.
//!
//! The filter core only sees the [`ObstacleMap`] trait; [`GridMap`] is the
//! concrete boolean-grid implementation, loadable from PPM images via
//! [`ppm`].

mod grid;
pub mod ppm;

pub use grid::{GridMap, ObstacleMap};
pub use ppm::MapError;
