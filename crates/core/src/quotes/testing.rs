//! Scripted quote provider shared by the core test suites.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use stockfolio_market_data::{
    AssetProfile, DailySeries, MarketDataError, Quote, QuoteProvider, RateLimit,
};

const PROVIDER_ID: &str = "SCRIPTED";

/// In-memory provider with per-call failure scripting and call counters.
///
/// Once it has answered a daily-series request with `RateLimited` (via
/// [`rate_limited_after`](Self::rate_limited_after)), any further daily-series
/// request panics until [`recover`](Self::recover) is called.
#[derive(Default)]
pub struct ScriptedQuoteProvider {
    prices: Mutex<HashMap<String, Decimal>>,
    names: Mutex<HashMap<String, String>>,
    series: Mutex<HashMap<String, DailySeries>>,
    failing_latest: Mutex<HashSet<String>>,
    failing_profile: AtomicBool,
    daily_errors: Mutex<VecDeque<MarketDataError>>,
    rate_limit_after: Mutex<Option<usize>>,
    rate_limited: AtomicBool,
    latest_calls: AtomicUsize,
    daily_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl ScriptedQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, symbol: &str, price: Decimal) -> Self {
        self.set_price(symbol, price);
        self
    }

    pub fn with_name(self, symbol: &str, name: &str) -> Self {
        self.names
            .lock()
            .unwrap()
            .insert(symbol.to_string(), name.to_string());
        self
    }

    pub fn with_close(self, symbol: &str, date: NaiveDate, close: Decimal) -> Self {
        self.series
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_insert_with(|| DailySeries::new(symbol))
            .insert(date, close);
        self
    }

    /// Latest-quote requests for `symbol` time out.
    pub fn failing_latest(self, symbol: &str) -> Self {
        self.failing_latest
            .lock()
            .unwrap()
            .insert(symbol.to_string());
        self
    }

    pub fn failing_profile(self) -> Self {
        self.failing_profile.store(true, Ordering::SeqCst);
        self
    }

    /// The next daily-series request fails with `error`. Queued in order.
    pub fn push_daily_error(self, error: MarketDataError) -> Self {
        self.daily_errors.lock().unwrap().push_back(error);
        self
    }

    /// Daily-series request number `n` (0-based) and later are rate limited.
    pub fn rate_limited_after(self, n: usize) -> Self {
        *self.rate_limit_after.lock().unwrap() = Some(n);
        self
    }

    /// Lifts the rate limit; daily-series requests succeed again.
    pub fn recover(&self) {
        *self.rate_limit_after.lock().unwrap() = None;
        self.rate_limited.store(false, Ordering::SeqCst);
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), price);
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub fn daily_calls(&self) -> usize {
        self.daily_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for ScriptedQuoteProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 600,
            min_delay: Duration::ZERO,
        }
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_latest.lock().unwrap().contains(symbol) {
            return Err(MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            });
        }
        let price = self.prices.lock().unwrap().get(symbol).copied();
        price
            .map(|p| Quote::new(symbol, p, PROVIDER_ID))
            .ok_or_else(|| MarketDataError::NoPriceData(symbol.to_string()))
    }

    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_profile.load(Ordering::SeqCst) {
            return Err(MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            });
        }
        Ok(AssetProfile {
            source: Some(PROVIDER_ID.to_string()),
            name: self.names.lock().unwrap().get(symbol).cloned(),
            ..Default::default()
        })
    }

    async fn get_daily_closes(&self, symbol: &str) -> Result<DailySeries, MarketDataError> {
        if self.rate_limited.load(Ordering::SeqCst) {
            panic!("daily series for {} requested after the provider rate limited", symbol);
        }
        let call = self.daily_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(limit) = *self.rate_limit_after.lock().unwrap() {
            if call >= limit {
                self.rate_limited.store(true, Ordering::SeqCst);
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
        }

        if let Some(error) = self.daily_errors.lock().unwrap().pop_front() {
            return Err(error);
        }

        Ok(self
            .series
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| DailySeries::new(symbol)))
    }
}
