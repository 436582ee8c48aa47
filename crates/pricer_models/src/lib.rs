//! # Pricer Models (L2: Pricing Engines)
//!
//! Vanilla option pricing on top of the `pricer_core` value types.
//!
//! This crate provides:
//! - Closed-form Black-Scholes price and Greeks ([`analytical`])
//! - Cox-Ross-Rubinstein binomial lattice with American exercise ([`lattice`])
//! - Static model selection ([`model::PricingModel`])
//! - Parallel batch pricing ([`batch`])
//! - Listed-chain valuation against last traded prices ([`chain`])
//! - Price and Greek surfaces over spot × days to expiry ([`sensitivity`])
//!
//! ## Design Principles
//!
//! - **Enum-based model selection** for static dispatch
//! - **Pure functions** over immutable inputs; safe to call from any thread
//! - **Defined boundaries**: expiry and zero volatility are priced, not rejected
//!
//! ## Example
//!
//! ```
//! use pricer_core::types::{OptionSpec, OptionType};
//! use pricer_models::analytical::AnalyticPricer;
//! use pricer_core::traits::OptionPricer;
//!
//! let spec = OptionSpec::new(150.0, 160.0, 0.5, 0.02, 0.25, OptionType::Call).unwrap();
//! let price = AnalyticPricer.price(&spec).unwrap();
//! let greeks = AnalyticPricer.greeks(&spec).unwrap();
//!
//! assert!((price - 7.168).abs() < 1e-2);
//! assert!((greeks.delta - 0.413).abs() < 1e-3);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod batch;
pub mod chain;
pub mod lattice;
pub mod model;
pub mod sensitivity;
