//! Glue between a scene host and the portfolio: places the bar layout on the
//! first suitable surface and turns taps into selections.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use super::scene_model::{layout_bars, nearest_bar, BarLayout};
use super::scene_traits::{
    PlaneAlignment, PlaneAnchor, SceneEventListener, ScenePoint, ScreenPoint,
};
use super::selection::SelectionController;
use crate::portfolio::Position;

/// The holdings as placed on an anchor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenePlacement {
    pub anchor: PlaneAnchor,
    pub bars: Vec<BarLayout>,
}

#[derive(Default)]
struct PresenterState {
    positions: Vec<Position>,
    placement: Option<ScenePlacement>,
}

pub struct ScenePresenter {
    state: RwLock<PresenterState>,
    selection: SelectionController,
}

impl ScenePresenter {
    pub fn new(positions: Vec<Position>, selection: SelectionController) -> Self {
        Self {
            state: RwLock::new(PresenterState {
                positions,
                placement: None,
            }),
            selection,
        }
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn placement(&self) -> Option<ScenePlacement> {
        self.state.read().ok().and_then(|s| s.placement.clone())
    }

    pub fn is_placement_ready(&self) -> bool {
        self.state
            .read()
            .map(|s| s.placement.is_some())
            .unwrap_or(false)
    }

    /// Replaces the holdings and re-lays out an existing placement.
    pub fn update_positions(&self, positions: Vec<Position>) {
        if let Ok(mut state) = self.state.write() {
            let bars = layout_bars(&positions);
            if let Some(placement) = state.placement.as_mut() {
                placement.bars = bars;
            }
            state.positions = positions;
        }
    }

    /// Forgets the placement and the selection. The next anchor places the
    /// holdings again.
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.write() {
            state.placement = None;
        }
        self.selection.reset();
    }

    fn is_known_symbol(&self, symbol: &str) -> bool {
        self.state
            .read()
            .map(|s| s.positions.iter().any(|p| p.ticker_symbol == symbol))
            .unwrap_or(false)
    }
}

impl SceneEventListener for ScenePresenter {
    fn on_anchor_detected(&self, anchor: &PlaneAnchor) {
        if anchor.alignment != PlaneAlignment::Horizontal {
            return;
        }
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if state.placement.is_some() {
            return;
        }

        let bars = layout_bars(&state.positions);
        info!(
            "Placing {} holdings on anchor {}",
            bars.len(),
            anchor.id
        );
        state.placement = Some(ScenePlacement {
            anchor: anchor.clone(),
            bars,
        });
    }

    fn on_tap(&self, point: ScreenPoint, hit_symbol: Option<&str>) {
        match hit_symbol {
            Some(symbol) if self.is_known_symbol(symbol) => self.selection.select(symbol),
            Some(symbol) => debug!("Tap at ({}, {}) hit unknown {}", point.x, point.y, symbol),
            None => debug!("Tap at ({}, {}) hit nothing", point.x, point.y),
        }
    }

    fn on_surface_hit(&self, world: ScenePoint) {
        let symbol = {
            let Ok(state) = self.state.read() else {
                return;
            };
            let Some(placement) = state.placement.as_ref() else {
                return;
            };
            let center = placement.anchor.center;
            let local = world.offset(-center.x, -center.y, -center.z);
            nearest_bar(&placement.bars, &local).map(|bar| bar.symbol.clone())
        };

        match symbol {
            Some(symbol) => self.selection.select(&symbol),
            None => debug!("No holding near surface hit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MockEventSink, PortfolioEvent};
    use crate::portfolio::Transaction;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn positions() -> Vec<Position> {
        ["AAPL", "MSFT"]
            .iter()
            .map(|symbol| {
                let mut position = Position::new(*symbol, *symbol);
                position.add_transaction(Transaction::buy(10, dec!(100), Utc::now()));
                position.current_price = dec!(120);
                position
            })
            .collect()
    }

    fn anchor(id: &str, alignment: PlaneAlignment) -> PlaneAnchor {
        PlaneAnchor {
            id: id.to_string(),
            center: ScenePoint::new(1.0, 0.0, -2.0),
            alignment,
        }
    }

    fn presenter() -> (ScenePresenter, MockEventSink) {
        let sink = MockEventSink::new();
        let selection = SelectionController::new(Arc::new(sink.clone()));
        (ScenePresenter::new(positions(), selection), sink)
    }

    #[tokio::test]
    async fn test_places_on_first_horizontal_anchor_only() {
        let (presenter, _) = presenter();

        presenter.on_anchor_detected(&anchor("wall", PlaneAlignment::Vertical));
        assert!(!presenter.is_placement_ready());

        presenter.on_anchor_detected(&anchor("floor", PlaneAlignment::Horizontal));
        presenter.on_anchor_detected(&anchor("table", PlaneAlignment::Horizontal));

        let placement = presenter.placement().unwrap();
        assert_eq!(placement.anchor.id, "floor");
        assert_eq!(placement.bars.len(), 2);

        presenter.reset();
        presenter.on_anchor_detected(&anchor("table", PlaneAlignment::Horizontal));
        assert_eq!(presenter.placement().unwrap().anchor.id, "table");
    }

    #[tokio::test]
    async fn test_tap_on_known_symbol_selects_it() {
        let (presenter, sink) = presenter();

        presenter.on_tap(ScreenPoint { x: 10.0, y: 20.0 }, Some("MSFT"));
        assert_eq!(presenter.selection().selected_symbol().as_deref(), Some("MSFT"));
        assert_eq!(
            sink.events(),
            vec![PortfolioEvent::SelectionChanged {
                symbol: Some("MSFT".to_string()),
                showing_detail: true,
            }]
        );

        presenter.on_tap(ScreenPoint::default(), Some("TSLA"));
        presenter.on_tap(ScreenPoint::default(), None);
        assert_eq!(presenter.selection().selected_symbol().as_deref(), Some("MSFT"));
    }

    #[tokio::test]
    async fn test_surface_hit_selects_nearest_bar() {
        let (presenter, _) = presenter();
        presenter.on_surface_hit(ScenePoint::new(1.0, 0.15, -2.0));
        assert!(presenter.selection().selected_symbol().is_none());

        presenter.on_anchor_detected(&anchor("floor", PlaneAlignment::Horizontal));
        // MSFT sits at x = 0 relative to the anchor
        presenter.on_surface_hit(ScenePoint::new(1.01, 0.15, -2.0));
        assert_eq!(presenter.selection().selected_symbol().as_deref(), Some("MSFT"));
    }

    #[tokio::test]
    async fn test_update_positions_relayouts_placement() {
        let (presenter, _) = presenter();
        presenter.on_anchor_detected(&anchor("floor", PlaneAlignment::Horizontal));

        let mut more = positions();
        more.push(Position::new("GOOGL", "Alphabet Inc"));
        presenter.update_positions(more);

        assert_eq!(presenter.placement().unwrap().bars.len(), 3);
    }
}
