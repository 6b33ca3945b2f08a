//! Indexed triangle storage with adjacency links.
//!
//! The mesh is two flat arrays: points and triangles. Triangles reference
//! points and each other exclusively by index, so in-place mutation during
//! edge flips never invalidates a reference - at worst an index must be
//! re-resolved after a swap, which the engines do by re-querying instead of
//! holding handles across mutations.

use crate::error::TriangulationError;
use crate::predicates::{ccw, point_on_open_segment};
use crate::primitives::Point2;
use num_traits::Float;
use std::collections::{HashSet, VecDeque};

/// A triangle stored as indices into the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaunayTriangle {
    /// Vertex indices into the point array, in counter-clockwise order.
    pub v: [usize; 3],
    /// `adj[k]` is the neighbor across edge `(v[k], v[(k + 1) % 3])`,
    /// or `None` on the mesh boundary.
    pub adj: [Option<usize>; 3],
}

impl DelaunayTriangle {
    /// Creates a triangle from vertex and adjacency indices.
    ///
    /// The caller is responsible for counter-clockwise vertex order.
    #[inline]
    pub fn new(v: [usize; 3], adj: [Option<usize>; 3]) -> Self {
        Self { v, adj }
    }

    /// Returns the directed edge `k` as a vertex index pair.
    #[inline]
    pub fn edge(&self, k: usize) -> (usize, usize) {
        (self.v[k], self.v[(k + 1) % 3])
    }

    /// Returns the vertex opposite edge `k`.
    #[inline]
    pub fn opposite_vertex(&self, k: usize) -> usize {
        self.v[(k + 2) % 3]
    }

    /// Checks if the triangle references vertex `p`.
    #[inline]
    pub fn has_vertex(&self, p: usize) -> bool {
        self.v.contains(&p)
    }

    /// Returns the local slot of vertex `p`, if present.
    #[inline]
    pub fn vertex_slot(&self, p: usize) -> Option<usize> {
        self.v.iter().position(|&x| x == p)
    }

    /// Returns the local slot of the directed edge `(a, b)`, if present.
    pub fn edge_slot(&self, a: usize, b: usize) -> Option<usize> {
        (0..3).find(|&k| self.edge(k) == (a, b))
    }

    /// Returns the local slot whose neighbor is triangle `t`, if any.
    #[inline]
    pub fn adjacent_slot(&self, t: usize) -> Option<usize> {
        self.adj.iter().position(|&a| a == Some(t))
    }
}

/// An oriented edge inside a specific triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeHandle {
    /// Index of the triangle owning the edge.
    pub triangle: usize,
    /// Local edge slot within the triangle (0, 1 or 2).
    pub edge: usize,
}

/// Result of walking a segment through the mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SegmentTrace {
    /// Directed edges strictly crossed by the open segment, in walk order.
    Crossings(VecDeque<(usize, usize)>),
    /// A mesh vertex lies exactly on the open segment; the segment must be
    /// split there before it can be forced.
    ThroughVertex(usize),
}

/// Normalizes an edge's endpoints into an unordered lookup key.
#[inline]
pub(crate) fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Growable point and triangle storage for one triangulation run.
///
/// Points are append-only; triangles are append-only but mutated in place
/// by the insertion and constraint engines. Nothing is ever deleted -
/// unwanted triangles are filtered out when the result is emitted.
#[derive(Debug, Clone, Default)]
pub struct TriangleSet<F> {
    points: Vec<Point2<F>>,
    triangles: Vec<DelaunayTriangle>,
}

impl<F: Float> TriangleSet<F> {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Clears all storage and reserves room for `expected_points` vertices.
    pub fn clear(&mut self, expected_points: usize) {
        self.points.clear();
        self.triangles.clear();
        self.points.reserve(expected_points + 3);
        self.triangles.reserve(2 * expected_points + 1);
    }

    /// Returns the number of stored points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of stored triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the point at `index`.
    #[inline]
    pub fn point(&self, index: usize) -> Point2<F> {
        self.points[index]
    }

    /// Returns all stored points.
    #[inline]
    pub fn points(&self) -> &[Point2<F>] {
        &self.points
    }

    /// Returns a copy of the triangle at `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> DelaunayTriangle {
        self.triangles[index]
    }

    /// Returns all stored triangles.
    #[inline]
    pub fn triangles(&self) -> &[DelaunayTriangle] {
        &self.triangles
    }

    /// Returns the index of a point with exactly these coordinates, if any.
    pub fn index_of_point(&self, p: Point2<F>) -> Option<usize> {
        self.points.iter().position(|&q| q == p)
    }

    /// Adds a point, returning the existing index if one coincides exactly.
    pub fn add_point(&mut self, p: Point2<F>) -> usize {
        if let Some(existing) = self.index_of_point(p) {
            return existing;
        }
        self.push_point(p)
    }

    /// Appends a point without a coincidence check.
    #[inline]
    pub(crate) fn push_point(&mut self, p: Point2<F>) -> usize {
        self.points.push(p);
        self.points.len() - 1
    }

    /// Appends a triangle and returns its index.
    ///
    /// The caller is responsible for counter-clockwise vertex order and for
    /// keeping adjacency symmetric.
    pub fn add_triangle(
        &mut self,
        v0: usize,
        v1: usize,
        v2: usize,
        a0: Option<usize>,
        a1: Option<usize>,
        a2: Option<usize>,
    ) -> usize {
        self.triangles
            .push(DelaunayTriangle::new([v0, v1, v2], [a0, a1, a2]));
        self.triangles.len() - 1
    }

    /// Overwrites the triangle at `index`.
    #[inline]
    pub fn replace_triangle(&mut self, index: usize, triangle: DelaunayTriangle) {
        self.triangles[index] = triangle;
    }

    /// Rewrites the adjacency slot of triangle `index` that pointed at
    /// `old_neighbor` to point at `new_neighbor`.
    pub fn replace_adjacent(&mut self, index: usize, old_neighbor: usize, new_neighbor: usize) {
        let tri = &mut self.triangles[index];
        if let Some(slot) = tri.adjacent_slot(old_neighbor) {
            tri.adj[slot] = Some(new_neighbor);
        } else {
            debug_assert!(false, "adjacency to {old_neighbor} not found in triangle {index}");
        }
    }

    /// Locates the triangle containing `p` by walking from `seed`.
    ///
    /// At each step the walk crosses the edge whose half-plane excludes `p`
    /// most strongly; it stops when every edge includes `p` (points on an
    /// edge count as contained). Leaving the mesh or exceeding the step cap
    /// means the input is degenerate or an invariant broke.
    pub fn find_containing_triangle(
        &self,
        p: Point2<F>,
        seed: usize,
    ) -> Result<usize, TriangulationError> {
        let mut current = seed;
        let max_steps = 4 * self.triangles.len() + 64;

        for _ in 0..max_steps {
            let tri = self.triangles[current];
            let mut crossing: Option<(usize, F)> = None;

            for k in 0..3 {
                let (a, b) = tri.edge(k);
                let side = ccw(self.points[a], self.points[b], p);
                if side < F::zero() && crossing.map_or(true, |(_, worst)| side < worst) {
                    crossing = Some((k, side));
                }
            }

            match crossing {
                None => return Ok(current),
                Some((k, _)) => {
                    current = tri.adj[k].ok_or(TriangulationError::PointLocationFailed)?;
                }
            }
        }

        Err(TriangulationError::PointLocationFailed)
    }

    /// Finds the triangle containing the directed edge `(a, b)`.
    pub fn find_edge(&self, a: usize, b: usize) -> Option<EdgeHandle> {
        self.triangles.iter().enumerate().find_map(|(t, tri)| {
            tri.edge_slot(a, b).map(|edge| EdgeHandle { triangle: t, edge })
        })
    }

    /// Checks if the undirected edge `(a, b)` exists in the mesh.
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.find_edge(a, b).is_some() || self.find_edge(b, a).is_some()
    }

    /// Returns the indices of all triangles referencing vertex `v`.
    pub fn triangles_with_vertex(&self, v: usize) -> Vec<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, tri)| tri.has_vertex(v))
            .map(|(t, _)| t)
            .collect()
    }

    /// Finds the triangle at vertex `from` whose interior angle contains
    /// the ray toward vertex `toward`.
    pub fn find_triangle_toward(
        &self,
        from: usize,
        toward: usize,
    ) -> Result<usize, TriangulationError> {
        let origin = self.points[from];
        let target = self.points[toward];

        for (t, tri) in self.triangles.iter().enumerate() {
            let Some(slot) = tri.vertex_slot(from) else {
                continue;
            };
            let u = self.points[tri.v[(slot + 1) % 3]];
            let w = self.points[tri.v[(slot + 2) % 3]];

            let toward_u = ccw(origin, u, target);
            let toward_w = ccw(origin, target, w);
            // A zero cross product also matches the ray pointing backwards
            // along an incident edge; the dot product rules that out.
            let behind_u = toward_u == F::zero() && (u - origin).dot(target - origin) <= F::zero();
            let behind_w = toward_w == F::zero() && (w - origin).dot(target - origin) <= F::zero();

            if toward_u >= F::zero() && toward_w >= F::zero() && !behind_u && !behind_w {
                return Ok(t);
            }
        }

        Err(TriangulationError::ConstraintFailed {
            from,
            to: toward,
        })
    }

    /// Walks the open segment from vertex `a` to vertex `b`, collecting
    /// every mesh edge it strictly crosses.
    ///
    /// `start` must be the triangle returned by [`find_triangle_toward`].
    /// If the segment passes exactly through a mesh vertex, the walk stops
    /// and reports that vertex instead so the caller can split there.
    pub(crate) fn trace_segment(
        &self,
        a: usize,
        b: usize,
        start: usize,
    ) -> Result<SegmentTrace, TriangulationError> {
        let pa = self.points[a];
        let pb = self.points[b];
        let mut crossings = VecDeque::new();

        let stalled = || TriangulationError::ConstraintFailed { from: a, to: b };

        // In the starting triangle the segment leaves through the edge
        // opposite `a`, unless it ends at or passes through one of that
        // edge's endpoints.
        let tri = self.triangles[start];
        let slot = tri.vertex_slot(a).ok_or_else(stalled)?;
        let u = tri.v[(slot + 1) % 3];
        let w = tri.v[(slot + 2) % 3];
        if u == b || w == b {
            return Ok(SegmentTrace::Crossings(crossings));
        }
        if point_on_open_segment(self.points[u], pa, pb) {
            return Ok(SegmentTrace::ThroughVertex(u));
        }
        if point_on_open_segment(self.points[w], pa, pb) {
            return Ok(SegmentTrace::ThroughVertex(w));
        }

        crossings.push_back((u, w));
        let mut current = tri.adj[(slot + 1) % 3].ok_or(TriangulationError::PointLocationFailed)?;
        let mut entry = (w, u);

        let max_steps = 4 * self.triangles.len() + 64;
        for _ in 0..max_steps {
            let tri = self.triangles[current];
            if tri.has_vertex(b) {
                return Ok(SegmentTrace::Crossings(crossings));
            }

            let m = tri.edge_slot(entry.0, entry.1).ok_or_else(stalled)?;
            let enter_a = tri.v[(m + 1) % 3];
            let apex = tri.v[(m + 2) % 3];

            if point_on_open_segment(self.points[apex], pa, pb) {
                return Ok(SegmentTrace::ThroughVertex(apex));
            }

            // The entry edge's endpoints straddle the segment line; the exit
            // edge is whichever of the remaining two also straddles it.
            let side_enter_a = ccw(pa, pb, self.points[enter_a]);
            let side_apex = ccw(pa, pb, self.points[apex]);
            let exit = if (side_apex > F::zero()) == (side_enter_a > F::zero()) {
                (m + 2) % 3
            } else {
                (m + 1) % 3
            };

            let (ea, eb) = tri.edge(exit);
            crossings.push_back((ea, eb));
            current = tri.adj[exit].ok_or(TriangulationError::PointLocationFailed)?;
            entry = (eb, ea);
        }

        Err(stalled())
    }

    /// Flood-fills the triangles strictly inside a closed boundary.
    ///
    /// `boundary` is the directed mesh-edge chain around the region,
    /// counter-clockwise, so the triangle owning the first directed edge
    /// lies inside. Propagation never crosses a boundary edge.
    pub fn triangles_in_polygon(
        &self,
        boundary: &[(usize, usize)],
    ) -> Result<Vec<usize>, TriangulationError> {
        let Some(&(b0, b1)) = boundary.first() else {
            return Ok(Vec::new());
        };
        let seed = self
            .find_edge(b0, b1)
            .ok_or(TriangulationError::ConstraintFailed { from: b0, to: b1 })?;

        let barrier: HashSet<(usize, usize)> =
            boundary.iter().map(|&(a, b)| edge_key(a, b)).collect();

        let mut seen = HashSet::new();
        let mut inside = Vec::new();
        let mut frontier = VecDeque::new();
        seen.insert(seed.triangle);
        frontier.push_back(seed.triangle);

        while let Some(t) = frontier.pop_front() {
            inside.push(t);
            let tri = self.triangles[t];
            for k in 0..3 {
                let (ea, eb) = tri.edge(k);
                if barrier.contains(&edge_key(ea, eb)) {
                    continue;
                }
                if let Some(n) = tri.adj[k] {
                    if seen.insert(n) {
                        frontier.push_back(n);
                    }
                }
            }
        }

        Ok(inside)
    }

    /// Asserts the structural mesh invariants: counter-clockwise winding,
    /// distinct vertex indices and symmetric adjacency.
    #[cfg(test)]
    pub(crate) fn assert_valid(&self) {
        for (t, tri) in self.triangles.iter().enumerate() {
            let [v0, v1, v2] = tri.v;
            assert!(v0 != v1 && v1 != v2 && v2 != v0, "triangle {t} repeats a vertex");
            assert!(
                v0 < self.points.len() && v1 < self.points.len() && v2 < self.points.len(),
                "triangle {t} references a missing point"
            );
            assert!(
                ccw(self.points[v0], self.points[v1], self.points[v2]) > F::zero(),
                "triangle {t} is not counter-clockwise"
            );

            for k in 0..3 {
                let Some(n) = tri.adj[k] else { continue };
                assert_ne!(n, t, "triangle {t} is its own neighbor");
                let other = &self.triangles[n];
                let back = other
                    .adjacent_slot(t)
                    .unwrap_or_else(|| panic!("adjacency {t} -> {n} is not symmetric"));
                let (a, b) = tri.edge(k);
                assert_eq!(
                    (b, a),
                    other.edge(back),
                    "shared edge between {t} and {n} disagrees"
                );
            }
        }
    }
}
