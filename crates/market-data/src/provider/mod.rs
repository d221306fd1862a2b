//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Provider rate limiting configuration
//! - The Alpha Vantage implementation
//!
//! The core crate only ever talks to `dyn QuoteProvider`, so tests can swap
//! in a scripted provider without touching the network.

mod capabilities;
mod traits;

pub mod alpha_vantage;

pub use capabilities::RateLimit;
pub use traits::QuoteProvider;
