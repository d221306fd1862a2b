//! Core error types for the Stockfolio application.
//!
//! Provider failures arrive as [`MarketDataError`] and are wrapped unchanged so
//! callers can still ask whether a failure was a transport problem or a
//! missing price.

use thiserror::Error;

pub use stockfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(String),

    #[error("Stock not found: {0}")]
    PositionNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Not enough shares to sell: {symbol} holds {held}, requested {requested}")]
    InsufficientShares {
        symbol: String,
        held: i64,
        requested: i64,
    },

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Returns true when the failure came from the quote provider's transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::MarketData(e) if e.is_transport())
    }

    /// Returns true when a batch of provider calls should stop and fall back
    /// to generated data.
    pub fn degrades_series(&self) -> bool {
        matches!(self, Error::MarketData(e) if e.degrades_series())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_error_wraps() {
        let err: Error = MarketDataError::NoPriceData("AAPL".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Market data operation failed: No price data available for AAPL"
        );
        assert!(!err.is_transport());

        let err: Error = MarketDataError::Timeout {
            provider: "ALPHA_VANTAGE".to_string(),
        }
        .into();
        assert!(err.is_transport());
    }

    #[test]
    fn test_insufficient_shares_display() {
        let err = Error::InsufficientShares {
            symbol: "AAPL".to_string(),
            held: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Not enough shares to sell: AAPL holds 3, requested 5"
        );
    }
}
