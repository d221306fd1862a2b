use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Calendar days walked back when the requested day has no close
pub const HISTORICAL_LOOKBACK_DAYS: u32 = 10;

/// Pause after each successful chart request to stay under provider limits
pub const CHART_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Half-width of the uniform jitter applied to synthetic chart points
pub const SYNTHETIC_NOISE: f64 = 0.02;

/// Floor for synthetic chart prices
pub const SYNTHETIC_MIN_PRICE: Decimal = dec!(0.01);

/// Interval between intraday chart reloads
pub const CHART_AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// How long a tapped holding stays selected before it is dismissed
pub const SELECTION_AUTO_DISMISS: Duration = Duration::from_secs(10);

/// Delay between hiding the detail card and clearing the selection
pub const SELECTION_CLEAR_DELAY: Duration = Duration::from_millis(300);

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
