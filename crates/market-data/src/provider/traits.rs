//! Quote provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{AssetProfile, DailySeries, Quote};

use super::capabilities::RateLimit;

/// Trait for quote providers.
///
/// Each method maps to one request against the provider. Implementations
/// must treat missing or malformed fields as "no data" and never panic on
/// provider output.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "ALPHA_VANTAGE".
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration for batch callers.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Fetch the latest quote for a symbol.
    ///
    /// Fails with [`MarketDataError::NoPriceData`] when the provider answers
    /// without a numeric price.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch the company overview for a symbol.
    ///
    /// A profile without a name is a valid answer; callers decide what to
    /// fall back to.
    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError>;

    /// Fetch the daily close series for a symbol.
    ///
    /// An answer without a series is returned as an empty [`DailySeries`].
    async fn get_daily_closes(&self, symbol: &str) -> Result<DailySeries, MarketDataError>;
}
