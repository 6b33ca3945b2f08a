//! Constrained Delaunay triangulation of planar point clouds.
//!
//! The triangulation is built incrementally: points are bucketed into a
//! spatial bin grid, inserted one at a time into a supertriangle-seeded
//! mesh with Delaunay restoration by edge flipping, and hole polygon edges
//! are then forced in by quadrilateral swaps. Hole interiors and
//! everything touching the supertriangle are filtered out of the result.
//!
//! # Example
//!
//! ```
//! use triangulum::{constrained_triangulation, Point2};
//!
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//!
//! let triangles = constrained_triangulation(&points, &[]).unwrap();
//!
//! // The square splits into two triangles along one of its diagonals.
//! assert_eq!(triangles.len(), 2);
//! let total: f64 = triangles.iter().map(|t| t.area()).sum();
//! assert!((total - 1.0).abs() < 1e-12);
//! ```

mod constraint;
mod insertion;
mod mesh;
mod pipeline;

pub use mesh::{DelaunayTriangle, EdgeHandle, TriangleSet};
pub use pipeline::{constrained_triangulation, Triangulator};

use crate::predicates::ccw;
use crate::primitives::Point2;
use num_traits::Float;

/// A triangle of the triangulation output.
///
/// Carries its three vertices in counter-clockwise order, in the same
/// coordinate space as the input points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle2<F> {
    /// First vertex.
    pub a: Point2<F>,
    /// Second vertex.
    pub b: Point2<F>,
    /// Third vertex.
    pub c: Point2<F>,
}

impl<F: Float> Triangle2<F> {
    /// Creates a triangle from three vertices.
    #[inline]
    pub fn new(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Self {
        Self { a, b, c }
    }

    /// Returns the vertices as an array.
    #[inline]
    pub fn vertices(&self) -> [Point2<F>; 3] {
        [self.a, self.b, self.c]
    }

    /// Returns the signed area: positive for counter-clockwise winding.
    #[inline]
    pub fn signed_area(&self) -> F {
        ccw(self.a, self.b, self.c) / F::from(2.0).unwrap()
    }

    /// Returns the absolute area.
    #[inline]
    pub fn area(&self) -> F {
        self.signed_area().abs()
    }

    /// Returns the centroid.
    pub fn centroid(&self) -> Point2<F> {
        let third = F::from(3.0).unwrap();
        Point2::new(
            (self.a.x + self.b.x + self.c.x) / third,
            (self.a.y + self.b.y + self.c.y) / third,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_triangle_area_and_centroid() {
        let tri: Triangle2<f64> = Triangle2::new(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        );
        assert_relative_eq!(tri.signed_area(), 2.0);
        assert_relative_eq!(tri.area(), 2.0);

        let c = tri.centroid();
        assert_relative_eq!(c.x, 2.0 / 3.0);
        assert_relative_eq!(c.y, 2.0 / 3.0);
    }

    #[test]
    fn test_clockwise_triangle_has_negative_signed_area() {
        let tri: Triangle2<f64> = Triangle2::new(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(2.0, 0.0),
        );
        assert_relative_eq!(tri.signed_area(), -2.0);
        assert_relative_eq!(tri.area(), 2.0);
    }
}
