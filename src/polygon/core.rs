//! Core polygon type and basic operations.

use crate::bounds::Aabb2;
use crate::primitives::Point2;
use num_traits::Float;

/// A simple polygon represented as a sequence of vertices.
///
/// The polygon is implicitly closed: the last vertex connects back to the
/// first. Counter-clockwise winding gives a positive signed area.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<F> {
    /// The vertices of the polygon.
    pub vertices: Vec<Point2<F>>,
}

impl<F: Float> Polygon<F> {
    /// Creates a new polygon from vertices.
    #[inline]
    pub fn new(vertices: Vec<Point2<F>>) -> Self {
        Self { vertices }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the signed area using the shoelace formula.
    ///
    /// Positive for counter-clockwise winding, negative for clockwise.
    pub fn signed_area(&self) -> F {
        polygon_signed_area(&self.vertices)
    }

    /// Returns the absolute area.
    pub fn area(&self) -> F {
        self.signed_area().abs()
    }

    /// Tests if the polygon winds counter-clockwise.
    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > F::zero()
    }

    /// Tests if a point is inside the polygon (even-odd rule).
    pub fn contains(&self, p: Point2<F>) -> bool {
        polygon_contains(&self.vertices, p)
    }

    /// Returns the bounding box, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<Aabb2<F>> {
        Aabb2::from_points(self.vertices.iter().copied())
    }
}

/// Computes the signed area of a vertex loop using the shoelace formula.
pub fn polygon_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }

    let mut twice_area = F::zero();
    let n = vertices.len();
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area = twice_area + vertices[i].x * vertices[j].y;
        twice_area = twice_area - vertices[j].x * vertices[i].y;
    }

    twice_area / F::from(2.0).unwrap()
}

/// Tests if a point is inside a vertex loop using even-odd ray casting.
pub fn polygon_contains<F: Float>(vertices: &[Point2<F>], p: Point2<F>) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_at_p = vi.x + (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y);
            if p.x < x_at_p {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
