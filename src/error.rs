//! Error types for triangulation operations.

use thiserror::Error;

/// Errors that can occur while building a constrained triangulation.
///
/// These are contract violations: the input did not satisfy the documented
/// preconditions, or a mesh invariant broke badly enough that the
/// incremental engine could not continue. Degenerate-but-recoverable input
/// (duplicate points, zero-length hole edges) is handled silently or with a
/// logged warning instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriangulationError {
    /// Fewer than three input points were supplied.
    #[error("at least 3 input points are required, found {found}")]
    TooFewPoints {
        /// Number of points actually supplied.
        found: usize,
    },

    /// A hole polygon is wound clockwise.
    #[error("hole polygon {hole} is wound clockwise; holes must be counter-clockwise")]
    ClockwiseHole {
        /// Zero-based index of the offending hole.
        hole: usize,
    },

    /// A hole polygon's edges cross each other.
    #[error("hole polygon {hole} is self-intersecting")]
    SelfIntersectingHole {
        /// Zero-based index of the offending hole.
        hole: usize,
    },

    /// A hole polygon has a vertex outside the bounding box of the input points.
    #[error("hole polygon {hole} has a vertex outside the point cloud's bounding box")]
    HoleOutsideCloud {
        /// Zero-based index of the offending hole.
        hole: usize,
    },

    /// The point-location walk left the triangulation or failed to converge.
    ///
    /// Indicates degenerate input (for example a large collinear fan) or a
    /// broken adjacency invariant.
    #[error("point location walked out of the triangulation; input may be degenerate")]
    PointLocationFailed,

    /// Forcing a constrained edge into the mesh stalled or lost an edge.
    #[error("failed to force constrained edge {from} -> {to} into the triangulation")]
    ConstraintFailed {
        /// Point index of the edge start.
        from: usize,
        /// Point index of the edge end.
        to: usize,
    },
}
