//! Forcing constrained edges into the triangulation.
//!
//! A constrained edge is carved in by collecting every mesh edge its
//! segment crosses and swapping them away one at a time. An edge can only
//! be swapped while the quadrilateral of its two triangles is convex;
//! non-convex cases go back on the queue until earlier swaps unblock them,
//! which is guaranteed to happen for simple, non-overlapping polygons.
//! Swaps whose new diagonal no longer crosses the segment are candidates
//! for a final Delaunay repair pass; the constraint itself is exempt.

use super::insertion::swap_edge;
use super::mesh::{edge_key, SegmentTrace, TriangleSet};
use crate::error::TriangulationError;
use crate::predicates::{in_circumcircle, is_quadrilateral_convex, segments_cross};
use num_traits::Float;
use std::collections::HashSet;

/// Forces the edge `a -> b` into the mesh.
///
/// If the open segment passes exactly through existing mesh vertices, the
/// constraint is split there and each sub-segment forced independently.
/// Every mesh edge that ends up covering `a -> b` is appended to `chain`
/// in order from `a` to `b` and registered in `constrained`, which all
/// Delaunay restoration passes treat as unflippable.
pub(crate) fn insert_constrained_edge<F: Float>(
    mesh: &mut TriangleSet<F>,
    a: usize,
    b: usize,
    constrained: &mut HashSet<(usize, usize)>,
    chain: &mut Vec<(usize, usize)>,
) -> Result<(), TriangulationError> {
    if a == b {
        return Ok(());
    }
    if mesh.contains_edge(a, b) {
        constrained.insert(edge_key(a, b));
        chain.push((a, b));
        return Ok(());
    }

    let start = mesh.find_triangle_toward(a, b)?;
    let mut queue = match mesh.trace_segment(a, b, start)? {
        SegmentTrace::ThroughVertex(v) => {
            insert_constrained_edge(mesh, a, v, constrained, chain)?;
            return insert_constrained_edge(mesh, v, b, constrained, chain);
        }
        SegmentTrace::Crossings(crossings) => crossings,
    };

    let stalled = TriangulationError::ConstraintFailed { from: a, to: b };
    let pa = mesh.point(a);
    let pb = mesh.point(b);
    let mut new_edges: Vec<(usize, usize)> = Vec::new();

    // Every crossed edge is eventually swapped away. The budget turns a
    // stall on contract-violating input into an error instead of a hang.
    let mut budget = (queue.len() + 4) * (queue.len() + 4) * 4;
    while let Some((p, q)) = queue.pop_front() {
        if budget == 0 {
            return Err(stalled.clone());
        }
        budget -= 1;

        // Re-resolve the edge: earlier swaps may have moved it to another
        // triangle or reversed its orientation, but never removed it.
        let handle = mesh
            .find_edge(p, q)
            .or_else(|| mesh.find_edge(q, p))
            .ok_or_else(|| stalled.clone())?;
        let tri = mesh.triangle(handle.triangle);
        let opp = tri.adj[handle.edge].ok_or_else(|| stalled.clone())?;
        let other = mesh.triangle(opp);
        let shared = other.adjacent_slot(handle.triangle).ok_or_else(|| stalled.clone())?;

        // Quadrilateral corners in CCW perimeter order: this triangle's
        // apex, the edge start, the neighbor's apex, the edge end.
        let apex = tri.opposite_vertex(handle.edge);
        let far = other.opposite_vertex(shared);
        let (ea, eb) = tri.edge(handle.edge);
        if !is_quadrilateral_convex(
            mesh.point(apex),
            mesh.point(ea),
            mesh.point(far),
            mesh.point(eb),
        ) {
            queue.push_back((p, q));
            continue;
        }

        swap_edge(mesh, handle.triangle, (handle.edge + 2) % 3, opp, shared);

        // The new diagonal joins the two apexes. If it still crosses the
        // constraint it goes back on the queue, otherwise it is kept for
        // the repair pass below.
        if segments_cross(mesh.point(apex), mesh.point(far), pa, pb) {
            queue.push_back((apex, far));
        } else {
            new_edges.push((apex, far));
        }
    }

    constrained.insert(edge_key(a, b));
    chain.push((a, b));

    // Restore as much Delaunay quality as the constraints permit.
    for (p, q) in new_edges {
        if constrained.contains(&edge_key(p, q)) {
            continue;
        }
        let Some(handle) = mesh.find_edge(p, q).or_else(|| mesh.find_edge(q, p)) else {
            continue;
        };
        let tri = mesh.triangle(handle.triangle);
        let Some(opp) = tri.adj[handle.edge] else {
            continue;
        };
        let other = mesh.triangle(opp);
        let Some(shared) = other.adjacent_slot(handle.triangle) else {
            continue;
        };
        let far = other.opposite_vertex(shared);

        if in_circumcircle(
            mesh.point(tri.v[0]),
            mesh.point(tri.v[1]),
            mesh.point(tri.v[2]),
            mesh.point(far),
        ) {
            swap_edge(mesh, handle.triangle, (handle.edge + 2) % 3, opp, shared);
        }
    }

    Ok(())
}
