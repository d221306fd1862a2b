//! Tests for QuoteClient.

use super::testing::ScriptedQuoteProvider;
use super::QuoteClient;
use crate::errors::{Error, MarketDataError};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quote_client(provider: ScriptedQuoteProvider) -> (QuoteClient, Arc<ScriptedQuoteProvider>) {
    let provider = Arc::new(provider);
    (QuoteClient::new(provider.clone()), provider)
}

#[tokio::test]
async fn test_fetch_current_price() {
    let (client, _) = quote_client(ScriptedQuoteProvider::new().with_price("AAPL", dec!(189.84)));
    assert_eq!(client.fetch_current_price("AAPL").await.unwrap(), dec!(189.84));
}

#[tokio::test]
async fn test_fetch_current_price_without_data() {
    let (client, _) = quote_client(ScriptedQuoteProvider::new());
    let err = client.fetch_current_price("NOPE").await.unwrap_err();
    assert!(matches!(
        err,
        Error::MarketData(MarketDataError::NoPriceData(ref s)) if s == "NOPE"
    ));
}

#[tokio::test]
async fn test_company_name_from_profile() {
    let (client, _) = quote_client(ScriptedQuoteProvider::new().with_name("AAPL", "Apple Inc"));
    assert_eq!(client.fetch_company_name("AAPL").await, "Apple Inc");
}

#[tokio::test]
async fn test_company_name_falls_back_to_symbol() {
    let (unnamed, _) = quote_client(ScriptedQuoteProvider::new());
    assert_eq!(unnamed.fetch_company_name("XYZ").await, "XYZ");

    let (failing, provider) = quote_client(ScriptedQuoteProvider::new().failing_profile());
    assert_eq!(failing.fetch_company_name("XYZ").await, "XYZ");
    assert_eq!(provider.profile_calls(), 1);
}

#[tokio::test]
async fn test_historical_close_exact_date() {
    let (client, provider) = quote_client(
        ScriptedQuoteProvider::new()
            .with_price("AAPL", dec!(200))
            .with_close("AAPL", day(2024, 3, 8), dec!(170.73)),
    );
    let friday = Utc.with_ymd_and_hms(2024, 3, 8, 18, 0, 0).unwrap();

    assert_eq!(
        client.fetch_historical_close("AAPL", friday).await.unwrap(),
        dec!(170.73)
    );
    assert_eq!(provider.latest_calls(), 0);
}

#[tokio::test]
async fn test_historical_close_walks_back_over_weekend() {
    let (client, _) = quote_client(
        ScriptedQuoteProvider::new()
            .with_close("AAPL", day(2024, 3, 7), dec!(169.00))
            .with_close("AAPL", day(2024, 3, 8), dec!(170.73)),
    );
    let sunday = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();

    assert_eq!(
        client.fetch_historical_close("AAPL", sunday).await.unwrap(),
        dec!(170.73)
    );
}

#[tokio::test]
async fn test_historical_close_reaches_tenth_day_back() {
    let (client, _) = quote_client(
        ScriptedQuoteProvider::new()
            .with_price("AAPL", dec!(200))
            .with_close("AAPL", day(2024, 3, 1), dec!(179.66)),
    );
    let target = Utc.with_ymd_and_hms(2024, 3, 11, 18, 0, 0).unwrap();

    assert_eq!(
        client.fetch_historical_close("AAPL", target).await.unwrap(),
        dec!(179.66)
    );
}

#[tokio::test]
async fn test_historical_close_falls_back_to_current_price() {
    let (client, provider) = quote_client(
        ScriptedQuoteProvider::new()
            .with_price("AAPL", dec!(200))
            // Eleven days back is out of reach
            .with_close("AAPL", day(2024, 2, 29), dec!(180.75)),
    );
    let target = Utc.with_ymd_and_hms(2024, 3, 11, 18, 0, 0).unwrap();

    assert_eq!(
        client.fetch_historical_close("AAPL", target).await.unwrap(),
        dec!(200)
    );
    assert_eq!(provider.latest_calls(), 1);
}

#[tokio::test]
async fn test_historical_close_propagates_series_error() {
    let (client, provider) = quote_client(
        ScriptedQuoteProvider::new()
            .with_price("AAPL", dec!(200))
            .push_daily_error(MarketDataError::Timeout {
                provider: "SCRIPTED".to_string(),
            }),
    );

    let err = client
        .fetch_historical_close("AAPL", Utc::now())
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(provider.latest_calls(), 0);
}

#[test]
fn test_request_delay_comes_from_provider() {
    let (client, _) = quote_client(ScriptedQuoteProvider::new());
    assert!(client.request_delay().is_zero());
    assert_eq!(client.provider_id(), "SCRIPTED");
}
