use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market quote for a symbol
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol the quote belongs to
    pub symbol: String,

    /// Last traded price
    pub price: Decimal,

    /// When the quote was received
    pub timestamp: DateTime<Utc>,

    /// Source of the quote (ALPHA_VANTAGE, ...)
    pub source: String,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: Decimal, source: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

/// Daily closing prices keyed by the provider's calendar date.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DailySeries {
    pub symbol: String,
    pub closes: BTreeMap<NaiveDate, Decimal>,
}

impl DailySeries {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            closes: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, date: NaiveDate, close: Decimal) {
        self.closes.insert(date, close);
    }

    /// Close on exactly `date`, if the market traded that day.
    pub fn close_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.closes.get(&date).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new("AAPL", dec!(150.25), "ALPHA_VANTAGE");
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(150.25));
        assert_eq!(quote.source, "ALPHA_VANTAGE");
    }

    #[test]
    fn test_daily_series_close_on() {
        let mut series = DailySeries::new("AAPL");
        let friday = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        series.insert(friday, dec!(185.92));

        assert_eq!(series.close_on(friday), Some(dec!(185.92)));
        assert_eq!(series.close_on(friday.succ_opt().unwrap()), None);
        assert_eq!(series.len(), 1);
        assert!(!series.is_empty());
    }
}
