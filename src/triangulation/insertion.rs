//! Incremental point insertion with Delaunay restoration.
//!
//! A point is inserted by locating the triangle containing it and splitting
//! that triangle into three children around the new vertex. A point landing
//! exactly on an existing edge instead splits the two triangles sharing
//! that edge into four, so no zero-area child is ever created. Afterwards
//! the empty-circumcircle property is restored with Lawson edge flips
//! propagated from a stack. Each flip strictly increases the mesh's
//! minimum angle ordering, so the propagation always terminates.

use super::mesh::{edge_key, DelaunayTriangle, TriangleSet};
use crate::error::TriangulationError;
use crate::predicates::{in_circumcircle, point_on_open_segment};
use crate::primitives::Point2;
use num_traits::Float;
use std::collections::HashSet;

/// Inserts `p` into the mesh and restores the Delaunay property around it.
///
/// Returns the point's index. Inserting a point that coincides exactly with
/// an existing one returns the existing index and leaves the mesh alone; a
/// point exactly on an existing edge splits that edge. Edges listed in
/// `constrained` are never flipped.
pub(crate) fn insert_point<F: Float>(
    mesh: &mut TriangleSet<F>,
    p: Point2<F>,
    flip_stack: &mut Vec<(usize, usize)>,
    constrained: &HashSet<(usize, usize)>,
) -> Result<usize, TriangulationError> {
    if let Some(existing) = mesh.index_of_point(p) {
        return Ok(existing);
    }

    // The most recently created triangle is spatially close to the previous
    // insertion, which the bin-grid ordering keeps close to this one.
    let seed = mesh.triangle_count() - 1;
    let host = mesh.find_containing_triangle(p, seed)?;
    let pi = mesh.push_point(p);

    let tri = mesh.triangle(host);
    let on_edge = (0..3).find(|&k| {
        let (ea, eb) = tri.edge(k);
        point_on_open_segment(p, mesh.point(ea), mesh.point(eb))
    });

    flip_stack.clear();
    match on_edge {
        Some(k) => split_edge(mesh, pi, host, k, flip_stack)?,
        None => split_interior(mesh, pi, host, flip_stack),
    }
    restore_delaunay(mesh, flip_stack, constrained);

    Ok(pi)
}

/// Splits the host triangle into a fan of three children around `pi`.
fn split_interior<F: Float>(
    mesh: &mut TriangleSet<F>,
    pi: usize,
    host: usize,
    flip_stack: &mut Vec<(usize, usize)>,
) {
    let tri = mesh.triangle(host);
    let [a, b, c] = tri.v;
    let [na, nb, nc] = tri.adj;

    let second = mesh.triangle_count();
    let third = second + 1;

    // Split host = (a, b, c) into (p, a, b), (p, b, c), (p, c, a). The host
    // is transformed in place into the first child; around `p`, slot 0 of
    // each child faces the previous sibling and slot 2 the next.
    mesh.replace_triangle(
        host,
        DelaunayTriangle::new([pi, a, b], [Some(third), na, Some(second)]),
    );
    mesh.add_triangle(pi, b, c, Some(host), nb, Some(third));
    mesh.add_triangle(pi, c, a, Some(second), nc, Some(host));

    if let Some(n) = nb {
        mesh.replace_adjacent(n, host, second);
    }
    if let Some(n) = nc {
        mesh.replace_adjacent(n, host, third);
    }

    if na.is_some() {
        flip_stack.push((host, 1));
    }
    if nb.is_some() {
        flip_stack.push((second, 1));
    }
    if nc.is_some() {
        flip_stack.push((third, 1));
    }
}

/// Splits the edge at slot `k` of `host` at the new vertex `pi`, which lies
/// exactly on it.
///
/// The host and the neighbor across the edge are each cut in two, giving a
/// fan of four children around `pi` (two on a boundary edge with no
/// neighbor). Every child is strictly counter-clockwise because `pi` lies
/// strictly between the edge's endpoints.
fn split_edge<F: Float>(
    mesh: &mut TriangleSet<F>,
    pi: usize,
    host: usize,
    k: usize,
    flip_stack: &mut Vec<(usize, usize)>,
) -> Result<(), TriangulationError> {
    let tri = mesh.triangle(host);
    let a = tri.v[k];
    let b = tri.v[(k + 1) % 3];
    let c = tri.v[(k + 2) % 3];
    let n_bc = tri.adj[(k + 1) % 3];
    let n_ca = tri.adj[(k + 2) % 3];

    let second = mesh.triangle_count();

    let Some(opp) = tri.adj[k] else {
        // Boundary edge: only the host is cut, into (p, b, c) and (p, c, a).
        mesh.replace_triangle(
            host,
            DelaunayTriangle::new([pi, b, c], [None, n_bc, Some(second)]),
        );
        mesh.add_triangle(pi, c, a, Some(host), n_ca, None);

        if let Some(n) = n_ca {
            mesh.replace_adjacent(n, host, second);
        }
        if n_bc.is_some() {
            flip_stack.push((host, 1));
        }
        if n_ca.is_some() {
            flip_stack.push((second, 1));
        }
        return Ok(());
    };

    let other = mesh.triangle(opp);
    let Some(m) = other.adjacent_slot(host) else {
        return Err(TriangulationError::PointLocationFailed);
    };
    // The neighbor traverses the split edge as (b, a); d is its apex.
    let d = other.opposite_vertex(m);
    let n_ad = other.adj[(m + 1) % 3];
    let n_db = other.adj[(m + 2) % 3];
    let fourth = second + 1;

    // Around `p` in counter-clockwise order: (p, b, c), (p, c, a),
    // (p, a, d), (p, d, b). Host and neighbor are transformed in place
    // into the first and third children.
    mesh.replace_triangle(
        host,
        DelaunayTriangle::new([pi, b, c], [Some(fourth), n_bc, Some(second)]),
    );
    mesh.add_triangle(pi, c, a, Some(host), n_ca, Some(opp));
    mesh.replace_triangle(
        opp,
        DelaunayTriangle::new([pi, a, d], [Some(second), n_ad, Some(fourth)]),
    );
    mesh.add_triangle(pi, d, b, Some(opp), n_db, Some(host));

    if let Some(n) = n_ca {
        mesh.replace_adjacent(n, host, second);
    }
    if let Some(n) = n_db {
        mesh.replace_adjacent(n, opp, fourth);
    }

    if n_bc.is_some() {
        flip_stack.push((host, 1));
    }
    if n_ca.is_some() {
        flip_stack.push((second, 1));
    }
    if n_ad.is_some() {
        flip_stack.push((opp, 1));
    }
    if n_db.is_some() {
        flip_stack.push((fourth, 1));
    }

    Ok(())
}

/// Drains the flip stack, swapping every edge whose neighboring triangle's
/// circumcircle strictly contains the vertex opposite it.
///
/// Stack entries are `(triangle, edge)` pairs naming the edge to test; the
/// vertex opposite that edge is the one whose insertion put the entry on
/// the stack. Constrained edges are skipped.
pub(crate) fn restore_delaunay<F: Float>(
    mesh: &mut TriangleSet<F>,
    flip_stack: &mut Vec<(usize, usize)>,
    constrained: &HashSet<(usize, usize)>,
) {
    while let Some((t, e)) = flip_stack.pop() {
        let tri = mesh.triangle(t);
        let Some(o) = tri.adj[e] else {
            continue;
        };
        let (ea, eb) = tri.edge(e);
        if constrained.contains(&edge_key(ea, eb)) {
            continue;
        }

        let inserted = tri.opposite_vertex(e);
        let other = mesh.triangle(o);
        if !in_circumcircle(
            mesh.point(other.v[0]),
            mesh.point(other.v[1]),
            mesh.point(other.v[2]),
            mesh.point(inserted),
        ) {
            continue;
        }

        let Some(m) = other.adjacent_slot(t) else {
            debug_assert!(false, "adjacency between {t} and {o} is not symmetric");
            continue;
        };

        swap_edge(mesh, t, (e + 2) % 3, o, m);
        // Both triangles now have a new edge facing the inserted vertex.
        flip_stack.push((t, e));
        flip_stack.push((o, (m + 1) % 3));
    }
}

/// Replaces the diagonal of the quadrilateral formed by two adjacent
/// triangles with the other diagonal.
///
/// `n` is the slot in `main` of the vertex not on the shared edge, so the
/// shared edge occupies `main`'s slot `(n + 1) % 3`; `m` is the slot in
/// `opp` where the shared edge starts. The two diagonals of the
/// quadrilateral must intersect or the result loses its counter-clockwise
/// winding. External neighbors that change owner are re-pointed.
pub(crate) fn swap_edge<F: Float>(
    mesh: &mut TriangleSet<F>,
    main: usize,
    n: usize,
    opp: usize,
    m: usize,
) {
    let o = (m + 2) % 3;
    let mut mt = mesh.triangle(main);
    let mut ot = mesh.triangle(opp);

    // Edge (main.v[n], main.v[n+1]) migrates to opp; edge
    // (opp.v[o], opp.v[m]) migrates to main.
    let main_outer = mt.adj[n];
    let opp_outer = ot.adj[o];

    mt.v[(n + 1) % 3] = ot.v[o];
    ot.v[m] = mt.v[n];

    ot.adj[m] = main_outer;
    mt.adj[n] = Some(opp);
    mt.adj[(n + 1) % 3] = opp_outer;
    ot.adj[o] = Some(main);

    mesh.replace_triangle(main, mt);
    mesh.replace_triangle(opp, ot);

    if let Some(t) = main_outer {
        mesh.replace_adjacent(t, main, opp);
    }
    if let Some(t) = opp_outer {
        mesh.replace_adjacent(t, opp, main);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::ccw;

    /// A mesh seeded with only the supertriangle used by the pipeline.
    fn seeded_mesh() -> TriangleSet<f64> {
        let mut mesh = TriangleSet::new();
        mesh.add_point(Point2::new(-100.0, -100.0));
        mesh.add_point(Point2::new(100.0, -100.0));
        mesh.add_point(Point2::new(0.0, 100.0));
        mesh.add_triangle(0, 1, 2, None, None, None);
        mesh
    }

    fn insert(mesh: &mut TriangleSet<f64>, x: f64, y: f64) -> usize {
        let mut stack = Vec::new();
        insert_point(mesh, Point2::new(x, y), &mut stack, &HashSet::new()).unwrap()
    }

    /// Asserts invariant 5: no triangle's circumcircle strictly contains
    /// the vertex opposite any of its neighbors.
    fn assert_delaunay(mesh: &TriangleSet<f64>) {
        for (t, tri) in mesh.triangles().iter().enumerate() {
            for k in 0..3 {
                let Some(n) = tri.adj[k] else { continue };
                let other = mesh.triangle(n);
                let m = other.adjacent_slot(t).unwrap();
                let far = other.opposite_vertex(m);
                assert!(
                    !in_circumcircle(
                        mesh.point(tri.v[0]),
                        mesh.point(tri.v[1]),
                        mesh.point(tri.v[2]),
                        mesh.point(far),
                    ),
                    "edge between triangles {t} and {n} violates the empty circumcircle"
                );
            }
        }
    }

    #[test]
    fn test_first_insertion_splits_supertriangle() {
        let mut mesh = seeded_mesh();
        let pi = insert(&mut mesh, 0.5, 0.5);

        assert_eq!(pi, 3);
        assert_eq!(mesh.triangle_count(), 3);
        mesh.assert_valid();
        // All three children share the new vertex.
        assert_eq!(mesh.triangles_with_vertex(pi).len(), 3);
    }

    #[test]
    fn test_duplicate_insertion_is_idempotent() {
        let mut mesh = seeded_mesh();
        let first = insert(&mut mesh, 0.25, 0.75);
        let count = mesh.triangle_count();
        let second = insert(&mut mesh, 0.25, 0.75);

        assert_eq!(first, second);
        assert_eq!(mesh.triangle_count(), count);
    }

    #[test]
    fn test_insertions_stay_delaunay() {
        let mut mesh = seeded_mesh();
        let coords = [
            (0.1, 0.2),
            (0.8, 0.1),
            (0.9, 0.9),
            (0.2, 0.85),
            (0.5, 0.5),
            (0.3, 0.3),
            (0.7, 0.6),
            (0.4, 0.8),
        ];
        for (x, y) in coords {
            insert(&mut mesh, x, y);
            mesh.assert_valid();
        }
        assert_delaunay(&mesh);
        assert_eq!(mesh.point_count(), 3 + coords.len());
    }

    #[test]
    fn test_insertion_on_existing_edge() {
        let mut mesh = seeded_mesh();
        let first = insert(&mut mesh, 0.0, 0.0);
        let second = insert(&mut mesh, 1.0, 0.0);
        assert!(mesh.contains_edge(first, second));

        // Exactly on the segment between the two previous points: the edge
        // is split and the new vertex connects to both of its endpoints.
        let pi = insert(&mut mesh, 0.5, 0.0);

        mesh.assert_valid();
        assert_delaunay(&mesh);
        assert!(!mesh.contains_edge(first, second));
        assert!(mesh.contains_edge(first, pi));
        assert!(mesh.contains_edge(second, pi));
    }

    #[test]
    fn test_insertion_on_shared_edge_splits_both_triangles() {
        // Two triangles over the unit square sharing the diagonal (0, 2);
        // inserting the diagonal's midpoint must yield a four-triangle fan.
        let mut mesh = TriangleSet::new();
        mesh.add_point(Point2::new(0.0, 0.0));
        mesh.add_point(Point2::new(1.0, 0.0));
        mesh.add_point(Point2::new(1.0, 1.0));
        mesh.add_point(Point2::new(0.0, 1.0));
        mesh.add_triangle(0, 1, 2, None, None, Some(1));
        mesh.add_triangle(0, 2, 3, Some(0), None, None);

        let pi = insert(&mut mesh, 0.5, 0.5);

        mesh.assert_valid();
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.triangles_with_vertex(pi).len(), 4);
        assert!(!mesh.contains_edge(0, 2));
        for corner in 0..4 {
            assert!(mesh.contains_edge(corner, pi));
        }
    }

    #[test]
    fn test_constrained_edge_is_not_flipped() {
        let mut mesh = seeded_mesh();
        insert(&mut mesh, 0.0, 0.0);
        insert(&mut mesh, 1.0, 0.0);
        insert(&mut mesh, 0.5, 0.8);
        assert!(mesh.contains_edge(3, 4));

        // Pin (3, 4); a point whose circumcircle test would normally flip
        // that edge must leave it in place.
        let constrained: HashSet<_> = [edge_key(3, 4)].into();
        let mut stack = Vec::new();
        insert_point(&mut mesh, Point2::new(0.5, -0.1), &mut stack, &constrained).unwrap();

        mesh.assert_valid();
        assert!(mesh.contains_edge(3, 4));
    }

    #[test]
    fn test_swap_edge_rewires_quadrilateral() {
        // Two triangles over the unit square, diagonal (0, 2).
        let mut mesh = TriangleSet::new();
        mesh.add_point(Point2::new(0.0, 0.0));
        mesh.add_point(Point2::new(1.0, 0.0));
        mesh.add_point(Point2::new(1.0, 1.0));
        mesh.add_point(Point2::new(0.0, 1.0));
        mesh.add_triangle(0, 1, 2, None, None, Some(1));
        mesh.add_triangle(0, 2, 3, Some(0), None, None);
        mesh.assert_valid();

        // Shared edge is slot 2 of triangle 0, so the off-edge vertex is
        // slot 1; in triangle 1 the shared edge starts at slot 0.
        swap_edge(&mut mesh, 0, 1, 1, 0);

        mesh.assert_valid();
        assert_eq!(mesh.triangle(0).v, [0, 1, 3]);
        assert_eq!(mesh.triangle(1).v, [1, 2, 3]);
        assert!(mesh.contains_edge(1, 3));
        assert!(!mesh.contains_edge(0, 2));
        for t in [0, 1] {
            let tri = mesh.triangle(t);
            assert!(ccw(
                mesh.point(tri.v[0]),
                mesh.point(tri.v[1]),
                mesh.point(tri.v[2])
            ) > 0.0);
        }
    }
}
