//! Price chart series and view state.

pub mod chart_builder;
pub mod chart_model;
pub mod chart_session;
pub mod chart_view;


pub use chart_builder::{sample_dates, synthetic_price, ChartConfig, ChartSeriesBuilder};
pub use chart_model::{enumerate_dates, ChartDataPoint, ChartTimeframe, Granularity};
pub use chart_session::{AutoRefreshHandle, ChartSession};
pub use chart_view::ChartView;
