//! Quote Client - Facade for the market-data crate.
//!
//! This module provides a clean interface between the core domain layer
//! and the market-data crate's provider.
//!
//! ```text
//! PortfolioService / ChartSeriesBuilder
//!                 │
//!                 ▼
//!           QuoteClient ──▶ dyn QuoteProvider ──▶ HTTP
//! ```
//!
//! The client adds the domain rules the provider knows nothing about: the
//! company-name fallback and the walk back over non-trading days when a
//! historical close is requested.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use stockfolio_market_data::QuoteProvider;

use crate::constants::HISTORICAL_LOOKBACK_DAYS;
use crate::errors::Result;
use crate::utils::time_utils::{days_back_from, market_date};

/// Quote client - fetches prices and names through a [`QuoteProvider`].
#[derive(Clone)]
pub struct QuoteClient {
    provider: Arc<dyn QuoteProvider>,
    lookback_days: u32,
}

impl QuoteClient {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            lookback_days: HISTORICAL_LOOKBACK_DAYS,
        }
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    /// Minimum pause the provider wants between consecutive batch requests.
    pub fn request_delay(&self) -> Duration {
        self.provider.rate_limit().min_delay
    }

    /// Latest price for a symbol.
    ///
    /// Fails with `NoPriceData` when the provider answers without a usable
    /// price, or with a transport error.
    pub async fn fetch_current_price(&self, symbol: &str) -> Result<Decimal> {
        let quote = self.provider.get_latest_quote(symbol).await?;
        Ok(quote.price)
    }

    /// Company name for a symbol, or the symbol itself if the provider has
    /// none on record. Never fails.
    pub async fn fetch_company_name(&self, symbol: &str) -> String {
        match self.provider.get_profile(symbol).await {
            Ok(profile) => match profile.display_name() {
                Some(name) => name.to_string(),
                None => {
                    debug!("No company name on record for {}, using symbol", symbol);
                    symbol.to_string()
                }
            },
            Err(e) => {
                warn!("Company lookup failed for {}: {}. Using symbol", symbol, e);
                symbol.to_string()
            }
        }
    }

    /// Close on the market date of `date`.
    ///
    /// Walks back up to ten calendar days for the nearest earlier close
    /// (weekends, holidays). If none of the candidates has a close, the
    /// current price is used instead.
    pub async fn fetch_historical_close(
        &self,
        symbol: &str,
        date: DateTime<Utc>,
    ) -> Result<Decimal> {
        let target = market_date(date);
        let series = self.provider.get_daily_closes(symbol).await?;

        for candidate in days_back_from(target, self.lookback_days) {
            if let Some(close) = series.close_on(candidate) {
                if candidate != target {
                    debug!(
                        "Using close from {} instead of {} for {}",
                        candidate, target, symbol
                    );
                }
                return Ok(close);
            }
        }

        debug!(
            "No close within {} days of {} for {}, using current price",
            self.lookback_days, target, symbol
        );
        self.fetch_current_price(symbol).await
    }
}
