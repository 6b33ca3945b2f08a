//! Validation checks for hole polygons.

use super::core::Polygon;
use crate::predicates::segments_cross;
use num_traits::Float;

/// Checks if a polygon has any self-intersections.
///
/// Returns true if any two non-adjacent edges cross in their interiors.
/// Edges that merely share a vertex do not count, so every simple polygon
/// passes.
pub fn has_self_intersection<F: Float>(polygon: &Polygon<F>) -> bool {
    let n = polygon.vertices.len();
    if n < 4 {
        return false;
    }

    for i in 0..n {
        let i_next = (i + 1) % n;
        let a1 = polygon.vertices[i];
        let a2 = polygon.vertices[i_next];

        for j in (i + 2)..n {
            let j_next = (j + 1) % n;
            if j_next == i {
                continue;
            }

            let b1 = polygon.vertices[j];
            let b2 = polygon.vertices[j_next];

            if segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    false
}

/// Checks if any two consecutive vertices coincide exactly.
///
/// The closing edge (last vertex back to the first) is included. Such
/// zero-length edges are skipped by the triangulator with a diagnostic.
pub fn has_consecutive_duplicates<F: Float>(polygon: &Polygon<F>) -> bool {
    let n = polygon.vertices.len();
    if n < 2 {
        return false;
    }

    (0..n).any(|i| polygon.vertices[i] == polygon.vertices[(i + 1) % n])
}
