//! Stockfolio Market Data Crate
//!
//! This crate provides provider-agnostic quote fetching for Stockfolio.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |   Core Domain    | --> |  QuoteProvider   | --> |  Alpha Vantage   |
//! |  (QuoteClient)   |     |     (trait)      |     |   (HTTP/JSON)    |
//! +------------------+     +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Latest price for a symbol
//! - [`DailySeries`] - Daily closes keyed by calendar date
//! - [`AssetProfile`] - Company overview data
//! - [`MarketDataError`] - Error taxonomy shared by all providers

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{AssetProfile, DailySeries, Quote};
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::{QuoteProvider, RateLimit};
