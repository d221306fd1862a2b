//! Error types for the market data crate.
//!
//! [`MarketDataError`] covers every way a quote request can fail. Callers that
//! need the coarse taxonomy (bad request construction, provider had no price,
//! transport failure) use [`MarketDataError::is_transport`]; chart builders use
//! [`MarketDataError::degrades_series`] to decide when to stop calling the
//! provider altogether.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request URL could not be built.
    /// Only happens with malformed symbols or a broken base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The provider answered but had no usable price field.
    #[error("No price data available for {0}")]
    NoPriceData(String),

    /// The requested symbol is unknown to the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rejected the request because of its call quota.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider body did not have the expected JSON shape.
    #[error("Unable to parse response from {provider}: {message}")]
    UnparseableResponse {
        /// The provider that returned the body
        provider: String,
        /// Decoder message
        message: String,
    },

    /// A provider-specific error occurred (non-2xx status, API error message).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns true for network, timeout and decoding failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockfolio_market_data::errors::MarketDataError;
    ///
    /// let error = MarketDataError::Timeout { provider: "ALPHA_VANTAGE".to_string() };
    /// assert!(error.is_transport());
    ///
    /// let error = MarketDataError::NoPriceData("AAPL".to_string());
    /// assert!(!error.is_transport());
    /// ```
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Network(_)
                | Self::ProviderError { .. }
                | Self::UnparseableResponse { .. }
        )
    }

    /// Returns true when further requests in the same batch are pointless.
    ///
    /// A rate limited provider keeps refusing until its window resets, and an
    /// unparseable body is what the provider sends once the quota is spent.
    pub fn degrades_series(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::UnparseableResponse { .. }
        )
    }
}
