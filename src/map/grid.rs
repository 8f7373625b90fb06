//! Boolean occupancy grid and the obstacle-surface trait.
//!
//! World coordinates are map units with one unit per cell; the valid domain
//! is `[0, width) x [0, height)`. Row-major storage, `index = y * width + x`.

/// Step length for ray marching, in map units (half a cell for accuracy).
const RAY_STEP: f64 = 0.5;

/// A queryable obstacle surface.
///
/// The surface is immutable for the filter's lifetime: the filter queries it
/// and never mutates it.
pub trait ObstacleMap {
    /// Grid width in cells.
    fn width(&self) -> usize;

    /// Grid height in cells.
    fn height(&self) -> usize;

    /// Whether the point lies on an obstacle.
    ///
    /// Callers must keep `(x, y)` inside `[0, width) x [0, height)`; an
    /// out-of-bounds query is a caller bug, not a runtime condition.
    fn is_obstacle(&self, x: f64, y: f64) -> bool;

    /// Whether the point is inside the surface's bounds.
    #[inline]
    fn in_bounds(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width() as f64 && y < self.height() as f64
    }

    /// Distance along `bearing_deg` to the first obstacle, or `max_range`
    /// if none is struck within it.
    ///
    /// A ray that leaves the map strikes nothing. Obstacle checks are
    /// guarded in-bounds, so the start point may be anywhere.
    fn range_to(&self, x: f64, y: f64, bearing_deg: f64, max_range: f64) -> f64 {
        let (sin_b, cos_b) = bearing_deg.to_radians().sin_cos();
        let mut travelled = 0.0;
        while travelled < max_range {
            let px = x + travelled * cos_b;
            let py = y + travelled * sin_b;
            if self.in_bounds(px, py) && self.is_obstacle(px, py) {
                return travelled;
            }
            travelled += RAY_STEP;
        }
        max_range
    }

    /// Whether the surface has at least one free cell (sampled at cell
    /// centers). Used to reject maps that cannot host a population.
    fn has_free_cell(&self) -> bool {
        for cy in 0..self.height() {
            for cx in 0..self.width() {
                if !self.is_obstacle(cx as f64 + 0.5, cy as f64 + 0.5) {
                    return true;
                }
            }
        }
        false
    }
}

/// 2D occupancy grid backed by a boolean vector.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: usize,
    height: usize,
    /// true = obstacle. Row-major: index = y * width + x
    cells: Vec<bool>,
}

impl GridMap {
    /// Create a fully open (obstacle-free) grid.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Create a grid from raw cells (used by the PPM decoder).
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid from ASCII rows: `'#'` is an obstacle, anything else is
    /// free. Rows are ordered top-to-bottom with increasing `y`.
    ///
    /// Intended for test fixtures:
    /// ```
    /// use disha_mcl::map::GridMap;
    ///
    /// let map = GridMap::from_rows(&[
    ///     "#####",
    ///     "#...#",
    ///     "#####",
    /// ]);
    /// assert_eq!(map.width(), 5);
    /// assert_eq!(map.height(), 3);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            assert_eq!(row.len(), width, "all rows must have the same length");
            cells.extend(row.bytes().map(|b| b == b'#'));
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Mark a cell as obstacle or free.
    pub fn set_obstacle(&mut self, cx: usize, cy: usize, occupied: bool) {
        assert!(cx < self.width && cy < self.height);
        self.cells[cy * self.width + cx] = occupied;
    }

    /// Obstacle state of a cell by index.
    pub fn cell(&self, cx: usize, cy: usize) -> bool {
        assert!(cx < self.width && cy < self.height);
        self.cells[cy * self.width + cx]
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }
}

impl ObstacleMap for GridMap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_obstacle(&self, x: f64, y: f64) -> bool {
        debug_assert!(
            self.in_bounds(x, y),
            "obstacle query out of bounds: ({}, {})",
            x,
            y
        );
        let cx = x.floor() as usize;
        let cy = y.floor() as usize;
        if cx < self.width && cy < self.height {
            self.cells[cy * self.width + cx]
        } else {
            false
        }
    }
}
