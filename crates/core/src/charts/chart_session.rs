//! A chart screen's lifecycle: loading, timeframe switches and the intraday
//! auto-refresh.

use log::{debug, info};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::chart_builder::ChartSeriesBuilder;
use super::chart_model::ChartTimeframe;
use super::chart_view::ChartView;
use crate::portfolio::Position;

/// Drives one position's chart. Cheap to clone; clones share the view.
#[derive(Clone)]
pub struct ChartSession {
    position: Arc<Position>,
    builder: Arc<ChartSeriesBuilder>,
    view: Arc<RwLock<ChartView>>,
}

impl ChartSession {
    pub fn new(
        position: Position,
        builder: Arc<ChartSeriesBuilder>,
        timeframe: ChartTimeframe,
    ) -> Self {
        Self {
            position: Arc::new(position),
            builder,
            view: Arc::new(RwLock::new(ChartView::new(timeframe))),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Copy of the current view state.
    pub fn view(&self) -> ChartView {
        self.view.read().map(|v| v.clone()).unwrap_or_default()
    }

    /// Shared handle for renderers that want to read the state in place.
    pub fn shared_view(&self) -> Arc<RwLock<ChartView>> {
        self.view.clone()
    }

    pub fn timeframe(&self) -> ChartTimeframe {
        self.view.read().map(|v| v.timeframe).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.view.read().map(|v| v.is_loading).unwrap_or(false)
    }

    /// Rebuilds the series for the selected timeframe.
    ///
    /// A result that arrives after the timeframe changed is dropped.
    pub async fn load(&self) {
        let timeframe = match self.view.write() {
            Ok(mut view) => {
                view.begin_loading();
                view.timeframe
            }
            Err(_) => return,
        };

        let points = self.builder.build(&self.position, timeframe).await;

        if let Ok(mut view) = self.view.write() {
            if view.timeframe != timeframe {
                debug!(
                    "Dropping stale {} chart for {}",
                    timeframe, self.position.ticker_symbol
                );
                view.is_loading = false;
                return;
            }
            if points.is_empty() {
                view.set_error("No price data available");
            } else {
                view.set_points(points);
            }
        }
    }

    /// Switches timeframe and reloads. Returns false when the timeframe is
    /// already selected or a load is in flight.
    pub async fn select_timeframe(&self, timeframe: ChartTimeframe) -> bool {
        {
            let Ok(mut view) = self.view.write() else {
                return false;
            };
            if view.timeframe == timeframe || view.is_loading {
                return false;
            }
            view.timeframe = timeframe;
        }
        self.load().await;
        true
    }

    /// Reloads every `interval` while the intraday timeframe is selected.
    ///
    /// The task stops when the returned handle is dropped.
    pub fn start_auto_refresh(&self, interval: Duration) -> AutoRefreshHandle {
        let session = self.clone();
        info!(
            "Chart auto-refresh started for {} ({:?} interval)",
            session.position.ticker_symbol, interval
        );
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if session.timeframe() != ChartTimeframe::OneDay || session.is_loading() {
                    continue;
                }
                debug!("Auto-refreshing chart for {}", session.position.ticker_symbol);
                session.load().await;
            }
        });
        AutoRefreshHandle { handle }
    }
}

/// Aborts the auto-refresh task when dropped.
pub struct AutoRefreshHandle {
    handle: JoinHandle<()>,
}

impl AutoRefreshHandle {
    /// Stops the task now rather than at end of scope.
    pub fn cancel(self) {}
}

impl Drop for AutoRefreshHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
