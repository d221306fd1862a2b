//! State behind a price chart screen.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::chart_model::{ChartDataPoint, ChartTimeframe};

/// Vertical padding added above and below the plotted range, as a fraction
/// of the span.
const RANGE_PADDING: Decimal = dec!(0.1);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub points: Vec<ChartDataPoint>,
    pub timeframe: ChartTimeframe,
    pub selected_date: Option<DateTime<Utc>>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl ChartView {
    pub fn new(timeframe: ChartTimeframe) -> Self {
        Self {
            timeframe,
            ..Default::default()
        }
    }

    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Replaces the series and selects its most recent point.
    pub fn set_points(&mut self, points: Vec<ChartDataPoint>) {
        self.selected_date = points.last().map(|p| p.date);
        self.points = points;
        self.is_loading = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.is_loading = false;
    }

    pub fn select_date(&mut self, date: DateTime<Utc>) {
        self.selected_date = Some(date);
    }

    /// Point closest in time to the selected date.
    pub fn selected_point(&self) -> Option<&ChartDataPoint> {
        let selected = self.selected_date?;
        self.points
            .iter()
            .min_by_key(|p| (p.date - selected).num_milliseconds().unsigned_abs())
    }

    /// Selected price minus the first price of the series.
    pub fn selected_price_change(&self) -> Decimal {
        match (self.selected_point(), self.points.first()) {
            (Some(selected), Some(first)) => selected.price - first.price,
            _ => Decimal::ZERO,
        }
    }

    /// Change from the first price to the selected one as a fraction
    /// (0.05 for +5%). Zero when the first price is not positive.
    pub fn selected_percent_change(&self) -> Decimal {
        match (self.selected_point(), self.points.first()) {
            (Some(selected), Some(first)) if first.price > Decimal::ZERO => {
                (selected.price - first.price) / first.price
            }
            _ => Decimal::ZERO,
        }
    }

    pub fn price_change(&self) -> Decimal {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.price - first.price,
            _ => Decimal::ZERO,
        }
    }

    pub fn is_up(&self) -> bool {
        self.price_change() >= Decimal::ZERO
    }

    /// Y-axis range: min to max padded by 10% of the span, `0..=100` when
    /// there is nothing to plot.
    pub fn price_range(&self) -> RangeInclusive<Decimal> {
        let mut prices = self.points.iter().map(|p| p.price);
        let Some(first) = prices.next() else {
            return Decimal::ZERO..=Decimal::ONE_HUNDRED;
        };
        let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let padding = (max - min) * RANGE_PADDING;
        (min - padding)..=(max + padding)
    }

    pub fn has_synthetic_points(&self) -> bool {
        self.points.iter().any(|p| p.synthetic)
    }
}
