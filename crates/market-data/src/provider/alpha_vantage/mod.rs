//! Alpha Vantage quote provider.
//!
//! Three endpoints are used: GLOBAL_QUOTE for the latest price, OVERVIEW for
//! the company name and TIME_SERIES_DAILY for historical closes.
//!
//! The free tier allows 5 calls per minute. Past that the API still answers
//! 200, with a "Note" or "Information" message in place of the data, so every
//! body is checked for those messages before it is read.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{AssetProfile, DailySeries, Quote};
use crate::provider::{QuoteProvider, RateLimit};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Status messages Alpha Vantage returns in a 200 body instead of data.
#[derive(Debug, Default, Deserialize)]
struct ApiMessages {
    #[serde(rename = "Error Message")]
    error: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl ApiMessages {
    /// Maps an error or quota message to the matching error. Other
    /// informational messages are logged and let through.
    fn check(&self) -> Result<(), MarketDataError> {
        if let Some(message) = &self.error {
            if message.contains("Invalid API call") || message.contains("not found") {
                return Err(MarketDataError::SymbolNotFound(message.clone()));
            }
            return Err(provider_error(message.clone()));
        }

        for message in [&self.note, &self.information].into_iter().flatten() {
            if is_quota_message(message) {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage says: {}", message);
        }
        Ok(())
    }
}

fn is_quota_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["api call frequency", "rate limit", "requests per day"]
        .iter()
        .any(|needle| lower.contains(needle))
}

fn provider_error(message: String) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message,
    }
}

/// A response body that may carry [`ApiMessages`] next to its payload.
trait Envelope: DeserializeOwned {
    fn messages(&self) -> &ApiMessages;
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteBody {
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
    #[serde(flatten)]
    messages: ApiMessages,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailySeriesBody {
    #[serde(rename = "Time Series (Daily)")]
    days: Option<HashMap<String, DailyBar>>,
    #[serde(flatten)]
    messages: ApiMessages,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: Option<String>,
}

/// The OVERVIEW fields we keep. The endpoint returns dozens more.
#[derive(Debug, Deserialize)]
struct OverviewBody {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(flatten)]
    messages: ApiMessages,
}

impl Envelope for GlobalQuoteBody {
    fn messages(&self) -> &ApiMessages {
        &self.messages
    }
}

impl Envelope for DailySeriesBody {
    fn messages(&self) -> &ApiMessages {
        &self.messages
    }
}

impl Envelope for OverviewBody {
    fn messages(&self) -> &ApiMessages {
        &self.messages
    }
}

impl From<OverviewBody> for AssetProfile {
    fn from(body: OverviewBody) -> Self {
        AssetProfile {
            source: Some(PROVIDER_ID.to_string()),
            name: body.name,
            sector: body.sector,
            industry: body.industry,
            description: body.description,
        }
    }
}

fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Builds the series, dropping entries whose date or close does not parse.
fn daily_series(symbol: &str, body: DailySeriesBody) -> DailySeries {
    let mut series = DailySeries::new(symbol);
    for (day, bar) in body.days.unwrap_or_default() {
        match parse_day(&day).zip(bar.close.as_deref().and_then(parse_price)) {
            Some((date, close)) => series.insert(date, close),
            None => debug!("Skipping unreadable {} close for {}", day, symbol),
        }
    }
    series
}

/// Alpha Vantage quote provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// A provider whose requests give up after `timeout`.
    pub fn with_timeout(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to a default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Sends requests to `base_url` instead of the public endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn redacted(&self, url: &Url) -> String {
        if self.api_key.is_empty() {
            url.to_string()
        } else {
            url.as_str().replace(&self.api_key, "***")
        }
    }

    /// Runs one query and decodes the body, surfacing any API message as an
    /// error.
    async fn query<T: Envelope>(&self, params: &[(&str, &str)]) -> Result<T, MarketDataError> {
        let mut params = params.to_vec();
        params.push(("apikey", self.api_key.as_str()));

        let url = Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| MarketDataError::InvalidUrl(e.to_string()))?;
        debug!("GET {}", self.redacted(&url));

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(provider_error(format!("HTTP {}", status)));
        }

        let text = response.text().await.map_err(MarketDataError::Network)?;
        let body: T = decode(&text)?;
        body.messages().check()?;
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(text).map_err(|e| MarketDataError::UnparseableResponse {
        provider: PROVIDER_ID.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 5,
            min_delay: Duration::from_millis(200),
        }
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let body: GlobalQuoteBody = self
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;

        let price = body
            .quote
            .and_then(|q| q.price)
            .as_deref()
            .and_then(parse_price)
            .ok_or_else(|| MarketDataError::NoPriceData(symbol.to_string()))?;
        debug!("{} last traded at {}", symbol, price);

        Ok(Quote::new(symbol, price, PROVIDER_ID))
    }

    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        let body: OverviewBody = self
            .query(&[("function", "OVERVIEW"), ("symbol", symbol)])
            .await?;
        Ok(body.into())
    }

    async fn get_daily_closes(&self, symbol: &str) -> Result<DailySeries, MarketDataError> {
        // 'compact' is the last 100 sessions; 'full' needs a premium key
        let body: DailySeriesBody = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
            ])
            .await?;

        let series = daily_series(symbol, body);
        debug!("{} daily closes for {}", series.len(), symbol);
        Ok(series)
    }
}
