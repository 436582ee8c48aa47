//! # pricer_core: Foundation types for option pricing and volatility surfaces
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Option value types: `OptionType`, `ExerciseStyle`, `OptionSpec` (`types::option`)
//! - Actual/365 day-count helpers (`types::time`)
//! - Error taxonomy: `PricingError` (`types::error`)
//! - The `OptionPricer` seam implemented by every engine (`traits`)
//! - Quote tables, the implied volatility `SurfaceBuilder` and its grid (`market_data`)
//! - Axis construction and nearest-node lookup (`math::grid`)
//!
//! ## Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates:
//! - num-traits: Generic floating-point formulas
//! - chrono: Expiration dates
//! - serde: Serialisation of value types
//! - rayon: Row-parallel surface construction
//! - tracing: Diagnostic events (silent unless a subscriber is installed)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::{SurfaceBuilder, SurfaceGridSpec, VolQuote};
//! use pricer_core::types::{OptionSpec, OptionType};
//!
//! let spec = OptionSpec::new(150.0, 160.0, 0.5, 0.02, 0.25, OptionType::Call).unwrap();
//! assert_eq!(spec.intrinsic(), 0.0);
//!
//! let quotes = [
//!     VolQuote::new(30, 150.0, 0.25).unwrap(),
//!     VolQuote::new(60, 160.0, 0.27).unwrap(),
//! ];
//! let grid = SurfaceGridSpec::fitted(&quotes, Some((75.0, 225.0))).unwrap();
//! let surface = SurfaceBuilder::new(150.0, grid).unwrap().build(&quotes).unwrap();
//! assert_eq!(surface.shape(), (10, 50));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod traits;
pub mod types;
