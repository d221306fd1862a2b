//! Chart series construction.
//!
//! A build samples the timeframe's calendar, asks the quote client for the
//! close on each sampled date and falls back to generated prices when the
//! provider cannot answer. Once the provider reports a rate limit or starts
//! returning garbage, the rest of that build is generated without touching
//! the network.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use super::chart_model::{enumerate_dates, ChartDataPoint, ChartTimeframe};
use crate::constants::{CHART_REQUEST_DELAY, SYNTHETIC_MIN_PRICE, SYNTHETIC_NOISE};
use crate::portfolio::Position;
use crate::quotes::QuoteClient;

/// Settings for chart builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartConfig {
    /// Pause after each successful close lookup.
    pub request_delay: Duration,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            request_delay: CHART_REQUEST_DELAY,
        }
    }
}

/// Downsamples `candidates` with a stride of `len / max_points` (at least 1).
///
/// The most recent candidate is always included, exactly once. When the
/// stride leaves more than `max_points + 1` dates, the oldest are dropped.
/// Input order is preserved.
pub fn sample_dates(candidates: Vec<DateTime<Utc>>, max_points: usize) -> Vec<DateTime<Utc>> {
    if candidates.len() <= max_points {
        return candidates;
    }
    let Some(&last) = candidates.last() else {
        return candidates;
    };

    let stride = (candidates.len() / max_points.max(1)).max(1);
    let mut sampled: Vec<DateTime<Utc>> = candidates.into_iter().step_by(stride).collect();
    if sampled.last() != Some(&last) {
        sampled.push(last);
    }

    let limit = max_points + 1;
    if sampled.len() > limit {
        sampled.drain(..sampled.len() - limit);
    }
    sampled
}

/// Generated price for a chart point: `current × (1 + trend × progress + noise)`,
/// never below 0.01.
pub fn synthetic_price(
    current: Decimal,
    trend: Decimal,
    progress: Decimal,
    noise: Decimal,
) -> Decimal {
    let price = current * (Decimal::ONE + trend * progress + noise);
    price.max(SYNTHETIC_MIN_PRICE)
}

fn random_noise() -> Decimal {
    let noise: f64 = rand::thread_rng().gen_range(-SYNTHETIC_NOISE..=SYNTHETIC_NOISE);
    Decimal::from_f64(noise).unwrap_or(Decimal::ZERO)
}

/// Builds price series for a position.
pub struct ChartSeriesBuilder {
    client: Arc<QuoteClient>,
    config: ChartConfig,
}

impl ChartSeriesBuilder {
    pub fn new(client: Arc<QuoteClient>, config: ChartConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> ChartConfig {
        self.config
    }

    /// Series for `timeframe` ending now. Never fails.
    pub async fn build(&self, position: &Position, timeframe: ChartTimeframe) -> Vec<ChartDataPoint> {
        self.build_at(position, timeframe, Utc::now()).await
    }

    /// Series for `timeframe` ending at `now`, sorted ascending by date.
    pub async fn build_at(
        &self,
        position: &Position,
        timeframe: ChartTimeframe,
        now: DateTime<Utc>,
    ) -> Vec<ChartDataPoint> {
        let symbol = position.ticker_symbol.as_str();
        let candidates = enumerate_dates(timeframe.start_date(now), now, timeframe.granularity());
        let sampled = sample_dates(candidates, timeframe.max_points());

        let total = Decimal::from(sampled.len());
        let trend = position.gain_loss_percent() / Decimal::ONE_HUNDRED;
        let current = position.current_price;

        let generate = |index: usize, date: DateTime<Utc>| {
            let progress = Decimal::from(index) / total;
            ChartDataPoint::synthetic(
                date,
                synthetic_price(current, trend, progress, random_noise()),
            )
        };

        debug!(
            "Building {} chart for {} over {} sampled dates",
            timeframe,
            symbol,
            sampled.len()
        );

        let mut degraded = false;
        let mut points = Vec::with_capacity(sampled.len());

        for (index, date) in sampled.into_iter().enumerate() {
            if degraded {
                points.push(generate(index, date));
                continue;
            }

            match self.client.fetch_historical_close(symbol, date).await {
                Ok(price) => {
                    points.push(ChartDataPoint::real(date, price));
                    if !self.config.request_delay.is_zero() {
                        tokio::time::sleep(self.config.request_delay).await;
                    }
                }
                Err(e) if e.degrades_series() => {
                    warn!(
                        "Chart data for {} degraded at {}: {}. Generating remaining points",
                        symbol, date, e
                    );
                    degraded = true;
                    points.push(generate(index, date));
                }
                Err(e) => {
                    debug!("No close for {} at {}: {}. Generating point", symbol, date, e);
                    points.push(generate(index, date));
                }
            }
        }

        points.sort_by_key(|p| p.date);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_sample_dates_keeps_short_lists() {
        let candidates: Vec<_> = (0..5)
            .map(|h| now() - chrono::Duration::hours(h))
            .rev()
            .collect();
        assert_eq!(sample_dates(candidates.clone(), 24), candidates);
    }

    #[test]
    fn test_sample_dates_for_every_timeframe() {
        let expected = [
            (ChartTimeframe::OneDay, 25),
            (ChartTimeframe::OneWeek, 8),
            (ChartTimeframe::OneMonth, 30),
            (ChartTimeframe::ThreeMonths, 13),
            (ChartTimeframe::OneYear, 13),
            (ChartTimeframe::All, 21),
        ];
        for (tf, len) in expected {
            let candidates = enumerate_dates(tf.start_date(now()), now(), tf.granularity());
            let last = *candidates.last().unwrap();
            let sampled = sample_dates(candidates, tf.max_points());

            assert_eq!(sampled.len(), len, "{}", tf);
            assert!(sampled.len() <= tf.max_points() + 1, "{}", tf);
            assert_eq!(sampled.iter().filter(|d| **d == last).count(), 1, "{}", tf);
            assert_eq!(sampled.last(), Some(&last));
            assert!(sampled.windows(2).all(|w| w[0] < w[1]), "{} not ascending", tf);
        }
    }

    #[test]
    fn test_sample_dates_uses_floor_stride() {
        // 61 monthly candidates, max 20: stride 3 lands exactly on the last
        let candidates: Vec<_> = (0..61)
            .map(|m| now() - chrono::Duration::days(30 * (60 - m)))
            .collect();
        let sampled = sample_dates(candidates.clone(), 20);

        assert_eq!(sampled.len(), 21);
        assert_eq!(sampled[0], candidates[0]);
        assert_eq!(sampled[1], candidates[3]);
        assert_eq!(sampled.last(), Some(&now()));
    }

    #[test]
    fn test_sample_dates_drops_oldest_past_limit() {
        // 14 weekly candidates, max 12: stride 1 keeps all 14, so the
        // oldest is dropped
        let weekly: Vec<_> = (0..14)
            .map(|w| now() - chrono::Duration::weeks(13 - w))
            .collect();
        let sampled = sample_dates(weekly.clone(), 12);
        assert_eq!(sampled, weekly[1..].to_vec());

        // 50 hourly candidates, max 24: stride 2 skips the last, which is
        // appended, and the oldest sample is dropped
        let hourly: Vec<_> = (0..50)
            .map(|h| now() - chrono::Duration::hours(49 - h))
            .collect();
        let sampled = sample_dates(hourly.clone(), 24);
        assert_eq!(sampled.len(), 25);
        assert_eq!(sampled[0], hourly[2]);
        assert_eq!(sampled[23], hourly[48]);
        assert_eq!(sampled.last(), Some(&now()));
    }

    #[test]
    fn test_synthetic_price_follows_trend() {
        assert_eq!(
            synthetic_price(dec!(100), dec!(0.5), dec!(0.5), dec!(0)),
            dec!(125)
        );
        assert_eq!(
            synthetic_price(dec!(100), dec!(0), dec!(0), dec!(0.02)),
            dec!(102)
        );
    }

    #[test]
    fn test_synthetic_price_has_floor() {
        assert_eq!(
            synthetic_price(dec!(100), dec!(-5), dec!(1), dec!(-0.02)),
            dec!(0.01)
        );
        assert_eq!(
            synthetic_price(dec!(0), dec!(0.3), dec!(0.5), dec!(0.02)),
            dec!(0.01)
        );
        assert_eq!(
            synthetic_price(dec!(-10), dec!(0), dec!(0), dec!(0)),
            dec!(0.01)
        );
    }

    #[test]
    fn test_random_noise_stays_in_band() {
        for _ in 0..200 {
            let noise = random_noise();
            assert!(noise >= dec!(-0.02) && noise <= dec!(0.02), "{}", noise);
        }
    }
}
