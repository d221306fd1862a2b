use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Timezone the quote provider stamps its daily series in.
/// US equity closes are keyed by the New York trading date.
pub const DEFAULT_MARKET_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to the market calendar date in the given timezone.
pub fn market_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default market timezone.
pub fn market_date(instant: DateTime<Utc>) -> NaiveDate {
    market_date_from_utc(instant, DEFAULT_MARKET_TZ)
}

/// Dates from `date` walking backwards, `date` itself first.
/// Yields `max_offset + 1` candidates unless the calendar runs out.
pub fn days_back_from(date: NaiveDate, max_offset: u32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(max_offset as usize + 1);
    let mut current = date;
    days.push(current);
    for _ in 0..max_offset {
        match current.pred_opt() {
            Some(prev) => {
                current = prev;
                days.push(current);
            }
            None => break,
        }
    }
    days
}
