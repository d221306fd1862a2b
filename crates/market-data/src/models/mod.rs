//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `quote` - Latest quote and daily close series (Quote, DailySeries)
//! - `profile` - Company overview data (AssetProfile)

mod profile;
mod quote;

pub use profile::AssetProfile;
pub use quote::{DailySeries, Quote};
