//! Uniform bin grid for spatially coherent insertion order.
//!
//! Inserting points into an incremental triangulation in a spatially random
//! order makes every point-location walk start far from its target. The bin
//! grid buckets the normalized points into a coarse uniform grid and hands
//! them back in boustrophedon (snake) order - bottom row to top row,
//! alternating left-to-right and right-to-left - so that consecutive
//! insertions land near each other and walks stay short.
//!
//! # Example
//!
//! ```
//! use triangulum::spatial::PointBinGrid;
//! use triangulum::{Aabb2, Point2};
//!
//! let extent = Aabb2::new(Point2::new(0.0_f64, 0.0), Point2::new(1.0, 1.0));
//! let mut grid = PointBinGrid::new(100, extent);
//!
//! grid.add_point(Point2::new(0.25, 0.75));
//! grid.add_point(Point2::new(0.9, 0.1));
//!
//! // 100 points -> ceil(100^(1/4)) = 4 cells per side.
//! assert_eq!(grid.cells_per_side(), 4);
//! assert_eq!(grid.points().count(), 2);
//! ```

use crate::bounds::Aabb2;
use crate::primitives::Point2;
use num_traits::Float;

/// A uniform grid bucketing points for locality-preserving iteration.
#[derive(Debug, Clone)]
pub struct PointBinGrid<F> {
    /// Cells in row-major order, `cells_per_side`² of them.
    cells: Vec<Vec<Point2<F>>>,
    cells_per_side: usize,
    extent: Aabb2<F>,
}

impl<F: Float> PointBinGrid<F> {
    /// Creates a grid sized for `expected_points` points over `extent`.
    ///
    /// The side length is `ceil(N^(1/4))` cells, the classic bin count for
    /// incremental triangulation seeding.
    pub fn new(expected_points: usize, extent: Aabb2<F>) -> Self {
        let cells_per_side = (expected_points as f64).powf(0.25).ceil().max(1.0) as usize;
        Self {
            cells: vec![Vec::new(); cells_per_side * cells_per_side],
            cells_per_side,
            extent,
        }
    }

    /// Returns the number of cells along one side of the grid.
    #[inline]
    pub fn cells_per_side(&self) -> usize {
        self.cells_per_side
    }

    /// Adds a point to the cell covering it.
    ///
    /// Cell indices are clamped to the grid, so points on (or marginally
    /// outside) the extent boundary land in the outermost cells.
    pub fn add_point(&mut self, p: Point2<F>) {
        let col = self.cell_index(p.x - self.extent.min.x, self.extent.width());
        let row = self.cell_index(p.y - self.extent.min.y, self.extent.height());
        self.cells[row * self.cells_per_side + col].push(p);
    }

    /// Iterates all points in boustrophedon cell order.
    ///
    /// Rows run bottom to top; even rows are traversed left to right and
    /// odd rows right to left.
    pub fn points(&self) -> impl Iterator<Item = &Point2<F>> + '_ {
        let side = self.cells_per_side;
        (0..side * side)
            .map(move |i| {
                let row = i / side;
                let col = if row % 2 == 0 {
                    i % side
                } else {
                    side - 1 - i % side
                };
                row * side + col
            })
            .flat_map(move |cell| self.cells[cell].iter())
    }

    fn cell_index(&self, offset: F, span: F) -> usize {
        if span <= F::zero() {
            return 0;
        }
        let side = F::from(self.cells_per_side).unwrap();
        let raw = (offset / span * side).floor().to_usize().unwrap_or(0);
        raw.min(self.cells_per_side - 1)
    }
}
