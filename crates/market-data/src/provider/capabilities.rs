//! Request pacing advertised by a provider.

use std::time::Duration;

/// How fast a provider may be called.
///
/// `min_delay` is what batch callers (chart builds, bulk refreshes) wait
/// between consecutive requests to the same provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub requests_per_minute: u32,
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            min_delay: Duration::from_millis(200),
        }
    }
}
