//! Display formatting for amounts, percentages and dates.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::DISPLAY_DECIMAL_PRECISION;

/// Formats an amount as US dollars, e.g. `$1,234.56` or `-$12.30`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{}${}.{}", sign, group_thousands(whole), frac)
}

/// Formats a percentage with an explicit sign for gains, e.g. `+12.34%`.
pub fn format_percent(percent: Decimal) -> String {
    let rounded = percent.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded > Decimal::ZERO {
        format!("+{:.2}%", rounded)
    } else if rounded.is_zero() {
        "0.00%".to_string()
    } else {
        format!("{:.2}%", rounded)
    }
}

/// Short US-style date, e.g. `1/12/24`.
pub fn format_short_date(date: DateTime<Utc>) -> String {
    date.format("%-m/%-d/%y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(1500)), "$1,500.00");
        assert_eq!(format_currency(dec!(15500.5)), "$15,500.50");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(106.666666)), "$106.67");
        assert_eq!(format_currency(dec!(-12.3)), "-$12.30");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(50)), "+50.00%");
        assert_eq!(format_percent(dec!(-20)), "-20.00%");
        assert_eq!(format_percent(dec!(0)), "0.00%");
        assert_eq!(format_percent(dec!(12.345)), "+12.35%");
    }

    #[test]
    fn test_format_short_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 12, 15, 30, 0).unwrap();
        assert_eq!(format_short_date(date), "1/12/24");
    }
}
