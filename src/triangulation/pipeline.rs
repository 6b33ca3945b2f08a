//! The triangulation pipeline driver.
//!
//! One call runs the whole construction: validate, normalize to the unit
//! square, bucket points into the bin grid, seed the supertriangle, insert
//! every point in boustrophedon order, force hole boundaries in as
//! constrained edges, flood-fill hole interiors, drop everything touching
//! the supertriangle, and denormalize the survivors into the caller's
//! coordinate space.

use super::constraint::insert_constrained_edge;
use super::insertion::insert_point;
use super::mesh::TriangleSet;
use super::Triangle2;
use crate::bounds::Aabb2;
use crate::error::TriangulationError;
use crate::polygon::{has_consecutive_duplicates, has_self_intersection, Polygon};
use crate::primitives::Point2;
use crate::spatial::PointBinGrid;
use log::warn;
use num_traits::Float;
use std::collections::HashSet;

/// Reusable constrained-triangulation engine.
///
/// Owns the mesh and the scratch buffers so repeated calls recycle their
/// allocations. All state is cleared at the start of every call; nothing
/// carries over between runs.
#[derive(Debug, Clone, Default)]
pub struct Triangulator<F> {
    mesh: TriangleSet<F>,
    flip_stack: Vec<(usize, usize)>,
    constrained: HashSet<(usize, usize)>,
}

impl<F: Float> Triangulator<F> {
    /// Creates a triangulator with empty buffers.
    pub fn new() -> Self {
        Self {
            mesh: TriangleSet::new(),
            flip_stack: Vec::new(),
            constrained: HashSet::new(),
        }
    }

    /// Triangulates `points`, subtracting the `holes`, into `out`.
    ///
    /// `out` is cleared first. Each hole must be a simple counter-clockwise
    /// polygon whose vertices lie within the bounding box of `points`;
    /// hole vertices become triangulation vertices and every hole edge is
    /// forced into the output as a constrained edge. Triangles inside a
    /// hole are omitted.
    ///
    /// Duplicate input points are deduplicated silently; degenerate holes
    /// (fewer than three distinct vertices, zero area) are skipped with a
    /// logged warning.
    pub fn triangulate_into(
        &mut self,
        points: &[Point2<F>],
        holes: &[Polygon<F>],
        out: &mut Vec<Triangle2<F>>,
    ) -> Result<(), TriangulationError> {
        out.clear();
        if points.len() < 3 {
            return Err(TriangulationError::TooFewPoints {
                found: points.len(),
            });
        }
        let bounds = Aabb2::from_points(points.iter().copied())
            .ok_or(TriangulationError::TooFewPoints { found: 0 })?;

        let mut usable = vec![true; holes.len()];
        for (i, hole) in holes.iter().enumerate() {
            usable[i] = validate_hole(i, hole, bounds)?;
        }

        // Normalize into the unit square, aspect preserved.
        let span = bounds.longest_side();
        let scale = if span > F::zero() { span } else { F::one() };
        let inv = F::one() / scale;
        let origin = bounds.min;
        let normalize =
            |p: Point2<F>| Point2::new((p.x - origin.x) * inv, (p.y - origin.y) * inv);
        let denormalize =
            |p: Point2<F>| Point2::new(p.x * scale + origin.x, p.y * scale + origin.y);

        let grid_extent = Aabb2::new(
            Point2::origin(),
            Point2::new(bounds.width() * inv, bounds.height() * inv),
        );
        let mut grid = PointBinGrid::new(points.len(), grid_extent);
        for p in points {
            grid.add_point(normalize(*p));
        }

        // Supertriangle comfortably enclosing the unit square; its three
        // vertices take indices 0..3.
        self.mesh.clear(points.len());
        self.constrained.clear();
        let hundred = F::from(100.0).unwrap();
        self.mesh.add_point(Point2::new(-hundred, -hundred));
        self.mesh.add_point(Point2::new(hundred, -hundred));
        self.mesh.add_point(Point2::new(F::zero(), hundred));
        self.mesh.add_triangle(0, 1, 2, None, None, None);

        for &p in grid.points() {
            insert_point(&mut self.mesh, p, &mut self.flip_stack, &self.constrained)?;
        }

        let mut doomed: HashSet<usize> = HashSet::new();
        for (i, hole) in holes.iter().enumerate() {
            if !usable[i] {
                continue;
            }

            // Insert the hole's vertices, deduplicating against existing
            // mesh vertices and collapsing zero-length edges.
            let mut ring: Vec<usize> = Vec::with_capacity(hole.len());
            for v in &hole.vertices {
                let idx = insert_point(
                    &mut self.mesh,
                    normalize(*v),
                    &mut self.flip_stack,
                    &self.constrained,
                )?;
                if ring.last() == Some(&idx) {
                    warn!("skipping zero-length edge in hole polygon {i}");
                    continue;
                }
                ring.push(idx);
            }
            if ring.len() > 1 && ring.first() == ring.last() {
                warn!("skipping zero-length closing edge in hole polygon {i}");
                ring.pop();
            }
            if ring.len() < 3 {
                warn!("hole polygon {i} collapsed to fewer than 3 vertices; ignoring it");
                continue;
            }

            // Force the boundary in, then flood its interior. The chain
            // lists the mesh edges actually covering the boundary, which
            // may be finer than the ring when edges pass through vertices.
            let mut chain: Vec<(usize, usize)> = Vec::new();
            for k in 0..ring.len() {
                let from = ring[k];
                let to = ring[(k + 1) % ring.len()];
                insert_constrained_edge(
                    &mut self.mesh,
                    from,
                    to,
                    &mut self.constrained,
                    &mut chain,
                )?;
            }
            for t in self.mesh.triangles_in_polygon(&chain)? {
                doomed.insert(t);
            }
        }

        // Everything touching a supertriangle vertex goes too.
        for v in 0..3 {
            for t in self.mesh.triangles_with_vertex(v) {
                doomed.insert(t);
            }
        }

        for (t, tri) in self.mesh.triangles().iter().enumerate() {
            if doomed.contains(&t) {
                continue;
            }
            let [v0, v1, v2] = tri.v;
            out.push(Triangle2::new(
                denormalize(self.mesh.point(v0)),
                denormalize(self.mesh.point(v1)),
                denormalize(self.mesh.point(v2)),
            ));
        }

        Ok(())
    }
}

/// Convenience wrapper building a fresh [`Triangulator`] for one call.
///
/// See [`Triangulator::triangulate_into`] for the input contract.
pub fn constrained_triangulation<F: Float>(
    points: &[Point2<F>],
    holes: &[Polygon<F>],
) -> Result<Vec<Triangle2<F>>, TriangulationError> {
    let mut out = Vec::new();
    Triangulator::new().triangulate_into(points, holes, &mut out)?;
    Ok(out)
}

/// Checks one hole polygon against the input contract.
///
/// Fatal violations (clockwise winding, self-intersection, vertices
/// outside the cloud) return an error; degenerate holes return `Ok(false)`
/// with a warning and are skipped by the caller.
fn validate_hole<F: Float>(
    index: usize,
    hole: &Polygon<F>,
    bounds: Aabb2<F>,
) -> Result<bool, TriangulationError> {
    if hole.len() < 3 || hole.signed_area() == F::zero() {
        warn!("skipping degenerate hole polygon {index}");
        return Ok(false);
    }
    if !hole.is_ccw() {
        return Err(TriangulationError::ClockwiseHole { hole: index });
    }
    if has_self_intersection(hole) {
        return Err(TriangulationError::SelfIntersectingHole { hole: index });
    }
    if hole.vertices.iter().any(|v| !bounds.contains(*v)) {
        return Err(TriangulationError::HoleOutsideCloud { hole: index });
    }
    if has_consecutive_duplicates(hole) {
        warn!("hole polygon {index} has zero-length edges; they will be skipped");
    }
    Ok(true)
}
