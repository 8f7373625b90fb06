//! Heading-aligned motion with wall-collision retry.
//!
//! Each cycle every particle, and the robot, travels a fixed distance along
//! its heading. A move that would land on a wall (or off the map) is not
//! committed; instead the heading is redrawn uniformly and the move retried
//! from the original position until a free destination is found or the retry
//! budget runs out.

use crate::core::types::Pose;
use crate::map::ObstacleMap;

use super::random::RandomSource;

/// Default cap on heading redraws when a move is blocked.
pub const DEFAULT_MAX_RETRIES: usize = 1000;

/// Result of one motion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// The pose moved to a collision-free destination.
    Moved,
    /// No collision-free heading was found; the pose is unchanged.
    Blocked,
}

/// Advance `pose` by `distance` along its heading.
///
/// A destination is blocked if it is out of bounds or on an obstacle
/// (out-of-map destinations count as collisions, which keeps every obstacle
/// query inside the surface's bounds). On a blocked move the heading is
/// redrawn uniformly in [0, 360) and the move retried from the original
/// position, up to `max_retries` times. On exhaustion the pose is left
/// unchanged and a warning is logged.
///
/// Zero distance from a free cell commits immediately and consumes no
/// randomness.
pub fn advance<M, R>(
    pose: &mut Pose,
    distance: f64,
    map: &M,
    rng: &mut R,
    max_retries: usize,
) -> MotionOutcome
where
    M: ObstacleMap + ?Sized,
    R: RandomSource + ?Sized,
{
    let (x, y) = pose.destination(distance);
    if is_clear(map, x, y) {
        pose.x = x;
        pose.y = y;
        return MotionOutcome::Moved;
    }

    for _ in 0..max_retries {
        let heading = rng.uniform() * 360.0;
        let trial = Pose::new(pose.x, pose.y, heading);
        let (x, y) = trial.destination(distance);
        if is_clear(map, x, y) {
            *pose = Pose::new(x, y, heading);
            return MotionOutcome::Moved;
        }
    }

    log::warn!(
        "no collision-free heading from ({:.1}, {:.1}) after {} attempts; holding position",
        pose.x,
        pose.y,
        max_retries
    );
    MotionOutcome::Blocked
}

#[inline]
fn is_clear<M: ObstacleMap + ?Sized>(map: &M, x: f64, y: f64) -> bool {
    map.in_bounds(x, y) && !map.is_obstacle(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::random::SeededRng;
    use crate::map::GridMap;
    use approx::assert_relative_eq;

    #[test]
    fn test_advance_free_path_keeps_heading() {
        let map = GridMap::open(10, 10);
        let mut rng = SeededRng::from_seed(1);
        let mut pose = Pose::new(2.0, 2.0, 0.0);

        let outcome = advance(&mut pose, 3.0, &map, &mut rng, 10);

        assert_eq!(outcome, MotionOutcome::Moved);
        assert_relative_eq!(pose.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(pose.theta, 0.0);
    }

    #[test]
    fn test_advance_redraws_heading_on_collision() {
        // Wall column directly east of the start
        let mut map = GridMap::open(10, 10);
        for cy in 0..10 {
            map.set_obstacle(5, cy, true);
        }
        let mut rng = SeededRng::from_seed(3);
        let mut pose = Pose::new(4.7, 5.0, 0.0);

        let outcome = advance(&mut pose, 1.0, &map, &mut rng, 1000);

        assert_eq!(outcome, MotionOutcome::Moved);
        // Heading was redrawn and the destination is clear
        assert!(pose.theta != 0.0);
        assert!(!map.is_obstacle(pose.x, pose.y));
    }

    #[test]
    fn test_advance_retries_from_original_position() {
        let mut map = GridMap::open(10, 10);
        for cy in 0..10 {
            map.set_obstacle(5, cy, true);
        }
        let mut rng = SeededRng::from_seed(3);
        let start = Pose::new(4.7, 5.0, 0.0);
        let mut pose = start;

        advance(&mut pose, 1.0, &map, &mut rng, 1000);

        // Destination must be one step from the ORIGINAL position
        let dx = pose.x - start.x;
        let dy = pose.y - start.y;
        assert_relative_eq!((dx * dx + dy * dy).sqrt(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_advance_blocked_leaves_pose_unchanged() {
        // Single free cell; every destination one unit away is a wall
        let map = GridMap::from_rows(&[
            "###",
            "#.#",
            "###",
        ]);
        let mut rng = SeededRng::from_seed(5);
        let start = Pose::new(1.5, 1.5, 45.0);
        let mut pose = start;

        let outcome = advance(&mut pose, 1.0, &map, &mut rng, 50);

        assert_eq!(outcome, MotionOutcome::Blocked);
        assert_eq!(pose, start);
    }

    #[test]
    fn test_advance_off_map_counts_as_collision() {
        let map = GridMap::open(4, 4);
        let mut rng = SeededRng::from_seed(8);
        // Facing west at the edge; a straight move would leave the map
        let mut pose = Pose::new(0.5, 2.0, 180.0);

        let outcome = advance(&mut pose, 1.0, &map, &mut rng, 1000);

        assert_eq!(outcome, MotionOutcome::Moved);
        assert!(map.in_bounds(pose.x, pose.y));
        assert!(!map.is_obstacle(pose.x, pose.y));
    }

    #[test]
    fn test_advance_zero_distance_is_noop() {
        let map = GridMap::open(4, 4);
        let mut rng_a = SeededRng::from_seed(11);
        let mut rng_b = SeededRng::from_seed(11);
        let mut pose = Pose::new(2.0, 2.0, 30.0);

        let outcome = advance(&mut pose, 0.0, &map, &mut rng_a, 100);

        assert_eq!(outcome, MotionOutcome::Moved);
        assert_eq!(pose, Pose::new(2.0, 2.0, 30.0));
        // No randomness consumed
        assert_eq!(rng_a.uniform(), rng_b.uniform());
    }
}
