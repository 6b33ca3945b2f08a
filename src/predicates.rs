//! Strict-sign geometric predicates for the triangulation engine.
//!
//! All predicates operate on plain floating-point coordinates and decide by
//! the exact sign of a determinant, with no tolerance band. Ties (zero
//! determinants) are resolved conservatively: a point on a circumcircle is
//! *not* inside it, and segments that merely touch at an endpoint do *not*
//! cross. The engine's edge-case policy is built on these conventions, so
//! they must not be "improved" with epsilons.

use crate::primitives::Point2;
use num_traits::Float;

/// Computes the orientation sign of three points.
///
/// Returns twice the signed area of triangle `abc`: positive if the points
/// wind counter-clockwise, negative if clockwise, zero if collinear.
///
/// # Example
///
/// ```
/// use triangulum::predicates::ccw;
/// use triangulum::Point2;
///
/// let a = Point2::new(0.0_f64, 0.0);
/// let b = Point2::new(1.0, 0.0);
///
/// assert!(ccw(a, b, Point2::new(0.5, 1.0)) > 0.0);
/// assert!(ccw(a, b, Point2::new(0.5, -1.0)) < 0.0);
/// assert_eq!(ccw(a, b, Point2::new(2.0, 0.0)), 0.0);
/// ```
#[inline]
pub fn ccw<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> F {
    (b - a).cross(c - a)
}

/// Tests if three points wind strictly counter-clockwise.
#[inline]
pub fn is_ccw<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> bool {
    ccw(a, b, c) > F::zero()
}

/// Tests if a point lies strictly inside the circumcircle of a triangle.
///
/// The triangle `a`, `b`, `c` must be in counter-clockwise order. Points
/// exactly on the circle are reported as outside, so cocircular point sets
/// never trigger an edge flip.
///
/// # Example
///
/// ```
/// use triangulum::predicates::in_circumcircle;
/// use triangulum::Point2;
///
/// let a = Point2::new(0.0_f64, 0.0);
/// let b = Point2::new(1.0, 0.0);
/// let c = Point2::new(0.0, 1.0);
///
/// assert!(in_circumcircle(a, b, c, Point2::new(0.4, 0.4)));
/// assert!(!in_circumcircle(a, b, c, Point2::new(2.0, 2.0)));
/// // (1, 1) is exactly cocircular with the right triangle: not inside.
/// assert!(!in_circumcircle(a, b, c, Point2::new(1.0, 1.0)));
/// ```
pub fn in_circumcircle<F: Float>(
    a: Point2<F>,
    b: Point2<F>,
    c: Point2<F>,
    d: Point2<F>,
) -> bool {
    // | ax-dx  ay-dy  (ax-dx)²+(ay-dy)² |
    // | bx-dx  by-dy  (bx-dx)²+(by-dy)² | > 0  iff d is inside (CCW triangle)
    // | cx-dx  cy-dy  (cx-dx)²+(cy-dy)² |
    let ax = a.x - d.x;
    let ay = a.y - d.y;
    let bx = b.x - d.x;
    let by = b.y - d.y;
    let cx = c.x - d.x;
    let cy = c.y - d.y;

    let aa = ax * ax + ay * ay;
    let bb = bx * bx + by * by;
    let cc = cx * cx + cy * cy;

    let det = ax * (by * cc - cy * bb) - ay * (bx * cc - cx * bb) + aa * (bx * cy - cx * by);

    det > F::zero()
}

/// Tests if a point lies inside a counter-clockwise triangle.
///
/// Points on an edge or vertex count as inside.
#[inline]
pub fn point_in_triangle<F: Float>(
    p: Point2<F>,
    a: Point2<F>,
    b: Point2<F>,
    c: Point2<F>,
) -> bool {
    ccw(a, b, p) >= F::zero() && ccw(b, c, p) >= F::zero() && ccw(c, a, p) >= F::zero()
}

/// Tests if two segments cross in their interiors.
///
/// Returns `false` for segments that only touch at an endpoint, share an
/// endpoint, or are collinear. This strictness is what lets the
/// crossed-edge walk traverse along an already-shared vertex without
/// reporting a spurious intersection.
///
/// # Example
///
/// ```
/// use triangulum::predicates::segments_cross;
/// use triangulum::Point2;
///
/// let a = Point2::new(0.0_f64, 0.0);
/// let b = Point2::new(2.0, 2.0);
/// let c = Point2::new(0.0, 2.0);
/// let d = Point2::new(2.0, 0.0);
///
/// assert!(segments_cross(a, b, c, d));
/// // Touching at an endpoint is not a crossing.
/// assert!(!segments_cross(a, b, b, d));
/// ```
pub fn segments_cross<F: Float>(
    p1: Point2<F>,
    p2: Point2<F>,
    p3: Point2<F>,
    p4: Point2<F>,
) -> bool {
    let d1 = ccw(p3, p4, p1);
    let d2 = ccw(p3, p4, p2);
    let d3 = ccw(p1, p2, p3);
    let d4 = ccw(p1, p2, p4);

    let zero = F::zero();
    ((d1 > zero && d2 < zero) || (d1 < zero && d2 > zero))
        && ((d3 > zero && d4 < zero) || (d3 < zero && d4 > zero))
}

/// Tests if the quadrilateral `p0 p1 p2 p3` (perimeter order) is strictly
/// convex.
///
/// Equivalent to its two diagonals intersecting in their interiors: all
/// four orientation signs around the perimeter must strictly agree. Two
/// triangles sharing an edge can only swap their diagonal when the
/// quadrilateral they form passes this test.
pub fn is_quadrilateral_convex<F: Float>(
    p0: Point2<F>,
    p1: Point2<F>,
    p2: Point2<F>,
    p3: Point2<F>,
) -> bool {
    let zero = F::zero();
    let s0 = ccw(p0, p1, p2);
    let s1 = ccw(p1, p2, p3);
    let s2 = ccw(p2, p3, p0);
    let s3 = ccw(p3, p0, p1);

    (s0 > zero && s1 > zero && s2 > zero && s3 > zero)
        || (s0 < zero && s1 < zero && s2 < zero && s3 < zero)
}

/// Tests if `p` lies exactly on the open segment `ab` (endpoints excluded).
///
/// Exact collinearity is required; this is the rule that decides when a
/// constrained edge must be split at an existing mesh vertex.
pub fn point_on_open_segment<F: Float>(p: Point2<F>, a: Point2<F>, b: Point2<F>) -> bool {
    let zero = F::zero();
    ccw(a, b, p) == zero && (p - a).dot(b - a) > zero && (p - b).dot(a - b) > zero
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ccw_signs() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(ccw(a, b, Point2::new(0.5, 1.0)) > 0.0);
        assert!(ccw(a, b, Point2::new(0.5, -1.0)) < 0.0);
        assert_eq!(ccw(a, b, Point2::new(3.0, 0.0)), 0.0);
        assert!(is_ccw(a, b, Point2::new(0.0, 1.0)));
        assert!(!is_ccw(a, b, Point2::new(2.0, 0.0)));
    }

    #[test]
    fn test_in_circumcircle_inside_and_outside() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.5, 0.866);
        assert!(in_circumcircle(a, b, c, Point2::new(0.5, 0.3)));
        assert!(!in_circumcircle(a, b, c, Point2::new(5.0, 5.0)));
    }

    #[test]
    fn test_in_circumcircle_cocircular_is_outside() {
        // Four corners of the unit square are cocircular; the strict test
        // must report "not inside" so no flip loop can start.
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        assert!(!in_circumcircle(a, b, c, Point2::new(0.0, 1.0)));
    }

    #[test]
    fn test_point_in_triangle() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(0.0, 2.0);
        assert!(point_in_triangle(Point2::new(0.5, 0.5), a, b, c));
        assert!(!point_in_triangle(Point2::new(1.5, 1.5), a, b, c));
        // Edge and vertex points count as inside.
        assert!(point_in_triangle(Point2::new(1.0, 0.0), a, b, c));
        assert!(point_in_triangle(a, a, b, c));
    }

    #[test]
    fn test_segments_cross_proper() {
        let p1: Point2<f64> = Point2::new(0.0, 0.0);
        let p2 = Point2::new(2.0, 2.0);
        let p3 = Point2::new(0.0, 2.0);
        let p4 = Point2::new(2.0, 0.0);
        assert!(segments_cross(p1, p2, p3, p4));
    }

    #[test]
    fn test_segments_cross_endpoint_touch_is_not_crossing() {
        let p1: Point2<f64> = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 1.0);
        let p3 = Point2::new(1.0, 1.0);
        let p4 = Point2::new(2.0, 0.0);
        assert!(!segments_cross(p1, p2, p3, p4));

        // T-junction: endpoint of one segment in the interior of the other.
        let t1 = Point2::new(0.0, 0.0);
        let t2 = Point2::new(2.0, 0.0);
        let t3 = Point2::new(1.0, 0.0);
        let t4 = Point2::new(1.0, 1.0);
        assert!(!segments_cross(t1, t2, t3, t4));
    }

    #[test]
    fn test_segments_cross_disjoint_and_collinear() {
        let p1: Point2<f64> = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 0.0);
        assert!(!segments_cross(
            p1,
            p2,
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0)
        ));
        assert!(!segments_cross(
            p1,
            p2,
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0)
        ));
    }

    #[test]
    fn test_quadrilateral_convexity() {
        let p0: Point2<f64> = Point2::new(0.0, 0.0);
        let p1 = Point2::new(1.0, 0.0);
        let p2 = Point2::new(1.0, 1.0);
        let p3 = Point2::new(0.0, 1.0);
        assert!(is_quadrilateral_convex(p0, p1, p2, p3));
        // Same square in clockwise order still agrees in sign.
        assert!(is_quadrilateral_convex(p3, p2, p1, p0));

        // Dart: p3 pulled inside the triangle p0 p1 p2.
        let dart = Point2::new(0.4, 0.3);
        assert!(!is_quadrilateral_convex(p0, p1, p2, dart));
    }

    #[test]
    fn test_point_on_open_segment() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        assert!(point_on_open_segment(Point2::new(1.0, 0.0), a, b));
        // Endpoints are excluded.
        assert!(!point_on_open_segment(a, a, b));
        assert!(!point_on_open_segment(b, a, b));
        // Collinear but beyond the segment.
        assert!(!point_on_open_segment(Point2::new(3.0, 0.0), a, b));
        // Off the line.
        assert!(!point_on_open_segment(Point2::new(1.0, 0.1), a, b));
    }
}
