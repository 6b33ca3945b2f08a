//! Spatial data structures for ordering point insertions.

mod bin_grid;

pub use bin_grid::PointBinGrid;
