//! Numerical helpers shared by the surface builder and sensitivity grids.
//!
//! - [`grid`]: evenly spaced axes and deterministic nearest-node lookup

pub mod grid;

pub use grid::{linspace, nearest_index};
