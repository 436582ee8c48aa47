//! Market data structures: option quote tables and implied volatility surfaces.
//!
//! # Components
//!
//! - [`quotes`]: Provider quote tables ([`ExpiryChain`], [`OptionQuoteRow`]) and
//!   their reduction to [`VolQuote`] points
//! - [`surfaces`]: Volatility surface trait, grid layout and [`SurfaceBuilder`]
//! - [`error`]: Market data error types ([`MarketDataError`])
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pricer_core::market_data::{collect_vol_quotes, ExpiryChain, OptionQuoteRow};
//! use pricer_core::market_data::surfaces::{SurfaceBuilder, SurfaceGridSpec};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let chains = vec![ExpiryChain {
//!     expiration: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
//!     calls: vec![OptionQuoteRow::new(95.0, 0.24), OptionQuoteRow::new(105.0, 0.20)],
//!     puts: vec![OptionQuoteRow::new(100.0, 0.22)],
//! }];
//!
//! let quotes = collect_vol_quotes(&chains, today, None);
//! let spec = SurfaceGridSpec::fitted(&quotes, None).unwrap();
//! let surface = SurfaceBuilder::new(100.0, spec).unwrap().build(&quotes).unwrap();
//! assert_eq!(surface.shape(), (5, 50));
//! ```

pub mod error;
pub mod quotes;
pub mod surfaces;

// Re-export commonly used types
pub use error::MarketDataError;
pub use quotes::{
    collect_vol_quotes, combined_smile, strike_window, ExpiryChain, OptionQuoteRow, SmilePoint,
    VolQuote, DEFAULT_STRIKE_WIDTH_PCT,
};
pub use surfaces::{SurfaceBuilder, SurfaceGridSpec, VolSurfaceGrid, VolatilitySurface};
