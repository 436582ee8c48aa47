//! Implied volatility surfaces.
//!
//! This module provides:
//! - [`VolatilitySurface`]: Generic trait for implied volatility lookup
//! - [`SurfaceGridSpec`]: Axis ranges and resolution of an output grid
//! - [`SurfaceBuilder`]: Nearest-neighbour reconstruction from sparse quotes
//! - [`VolSurfaceGrid`]: The resulting regular (days, strike) grid

mod builder;
mod grid;
mod traits;

pub use builder::SurfaceBuilder;
pub use grid::{SurfaceGridSpec, VolSurfaceGrid, DEFAULT_GRID_POINTS};
pub use traits::VolatilitySurface;
