//! Chart timeframes and data points.

use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Window of history shown by a price chart.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartTimeframe {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

/// Step between consecutive candidate dates of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
}

impl Granularity {
    /// The `step`-th date after `start`. Months are added on the calendar
    /// (clamped to month end), everything else as a fixed duration.
    pub fn nth_after(self, start: DateTime<Utc>, step: u32) -> Option<DateTime<Utc>> {
        let step_i64 = i64::from(step);
        match self {
            Granularity::Hour => start.checked_add_signed(Duration::hours(step_i64)),
            Granularity::Day => start.checked_add_signed(Duration::days(step_i64)),
            Granularity::Week => start.checked_add_signed(Duration::weeks(step_i64)),
            Granularity::Month => start.checked_add_months(Months::new(step)),
        }
    }
}

impl ChartTimeframe {
    pub const ALL: [ChartTimeframe; 6] = [
        ChartTimeframe::OneDay,
        ChartTimeframe::OneWeek,
        ChartTimeframe::OneMonth,
        ChartTimeframe::ThreeMonths,
        ChartTimeframe::OneYear,
        ChartTimeframe::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartTimeframe::OneDay => "1D",
            ChartTimeframe::OneWeek => "1W",
            ChartTimeframe::OneMonth => "1M",
            ChartTimeframe::ThreeMonths => "3M",
            ChartTimeframe::OneYear => "1Y",
            ChartTimeframe::All => "ALL",
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            ChartTimeframe::OneDay => Granularity::Hour,
            ChartTimeframe::OneWeek | ChartTimeframe::OneMonth => Granularity::Day,
            ChartTimeframe::ThreeMonths => Granularity::Week,
            ChartTimeframe::OneYear | ChartTimeframe::All => Granularity::Month,
        }
    }

    pub fn max_points(&self) -> usize {
        match self {
            ChartTimeframe::OneDay => 24,
            ChartTimeframe::OneWeek => 7,
            ChartTimeframe::OneMonth => 30,
            ChartTimeframe::ThreeMonths => 12,
            ChartTimeframe::OneYear => 12,
            ChartTimeframe::All => 20,
        }
    }

    /// First instant of the window ending at `now`.
    pub fn start_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let start = match self {
            ChartTimeframe::OneDay => now.checked_sub_signed(Duration::days(1)),
            ChartTimeframe::OneWeek => now.checked_sub_signed(Duration::days(7)),
            ChartTimeframe::OneMonth => now.checked_sub_months(Months::new(1)),
            ChartTimeframe::ThreeMonths => now.checked_sub_months(Months::new(3)),
            ChartTimeframe::OneYear => now.checked_sub_months(Months::new(12)),
            ChartTimeframe::All => now.checked_sub_months(Months::new(60)),
        };
        start.unwrap_or(now)
    }

    /// Tick label for a point on this timeframe's x-axis.
    pub fn axis_label(&self, date: DateTime<Utc>) -> String {
        let pattern = match self {
            ChartTimeframe::OneDay => "%H:%M",
            ChartTimeframe::OneWeek | ChartTimeframe::OneMonth => "%b %-d",
            _ => "%b %Y",
        };
        date.format(pattern).to_string()
    }
}

impl fmt::Display for ChartTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartTimeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChartTimeframe::ALL
            .into_iter()
            .find(|tf| tf.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Validation(format!("Unknown chart timeframe: {}", s)))
    }
}

/// Candidate dates from `start` to `end` inclusive, stepping by `granularity`.
pub fn enumerate_dates(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> Vec<DateTime<Utc>> {
    let mut dates = Vec::new();
    let mut step = 0u32;
    while let Some(date) = granularity.nth_after(start, step) {
        if date > end {
            break;
        }
        dates.push(date);
        step += 1;
    }
    dates
}

/// One point of a price chart. Never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    pub date: DateTime<Utc>,
    pub price: Decimal,
    /// True when the price was generated rather than fetched.
    pub synthetic: bool,
}

impl ChartDataPoint {
    pub fn real(date: DateTime<Utc>, price: Decimal) -> Self {
        Self {
            date,
            price,
            synthetic: false,
        }
    }

    pub fn synthetic(date: DateTime<Utc>, price: Decimal) -> Self {
        Self {
            date,
            price,
            synthetic: true,
        }
    }
}
