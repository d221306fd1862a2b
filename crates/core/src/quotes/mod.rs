//! Quote access for the domain layer.
//!
//! - [`client`] - Facade over the market-data crate's [`QuoteProvider`]
//!
//! ```text
//! PortfolioService ─┐
//!                   ├─▶ QuoteClient ─▶ market-data crate (provider)
//! ChartSeriesBuilder┘
//! ```
//!
//! [`QuoteProvider`]: stockfolio_market_data::QuoteProvider

pub mod client;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod client_tests;

pub use client::QuoteClient;
