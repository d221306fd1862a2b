//! Stockfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for Stockfolio: position valuation,
//! quote lookups with historical fallback, chart series, the portfolio
//! workflows and the data behind the 3D holdings scene. Persistence is
//! abstracted behind [`portfolio::PortfolioRepositoryTrait`]; quotes come from
//! any [`stockfolio_market_data::QuoteProvider`].

pub mod charts;
pub mod constants;
pub mod errors;
pub mod events;
pub mod portfolio;
pub mod quotes;
pub mod scene;
pub mod utils;

// Re-export common types from the portfolio module
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
