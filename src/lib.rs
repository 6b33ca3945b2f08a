//! triangulum - Constrained Delaunay triangulation
//!
//! Builds a Delaunay triangulation of a planar point cloud by incremental
//! insertion, then optionally carves out holes bounded by simple
//! counter-clockwise polygons. Hole edges are forced into the mesh as
//! constrained edges; everywhere else the empty-circumcircle property
//! holds.
//!
//! # Example
//!
//! ```
//! use triangulum::{constrained_triangulation, Point2, Polygon};
//!
//! let points: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let hole = Polygon::new(vec![
//!     Point2::new(0.25, 0.25),
//!     Point2::new(0.75, 0.25),
//!     Point2::new(0.75, 0.75),
//!     Point2::new(0.25, 0.75),
//! ]);
//!
//! let triangles = constrained_triangulation(&points, &[hole]).unwrap();
//!
//! let total: f64 = triangles.iter().map(|t| t.area()).sum();
//! assert!((total - 0.75).abs() < 1e-9);
//! ```

pub mod bounds;
pub mod error;
pub mod polygon;
pub mod predicates;
pub mod primitives;
pub mod spatial;
pub mod triangulation;

pub use bounds::Aabb2;
pub use error::TriangulationError;
pub use polygon::Polygon;
pub use primitives::{Point2, Vec2};
pub use triangulation::{constrained_triangulation, Triangle2, Triangulator};
