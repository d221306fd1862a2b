//! Bar layout for the 3D holdings scene.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::scene_traits::ScenePoint;
use crate::portfolio::valuation::value_weight;
use crate::portfolio::Position;

/// Distance between neighbouring bars, in meters
pub const BAR_SPACING: f32 = 0.15;

/// Bars per row
pub const MAX_COLUMNS: usize = 4;

/// Height of a bar holding the whole portfolio, before the base height
pub const HEIGHT_SCALE: f32 = 0.5;

/// Height of a bar with no value
pub const BASE_HEIGHT: f32 = 0.05;

/// Gap between a bar's top and its label
pub const LABEL_OFFSET: f32 = 0.05;

/// Footprint of a bar, in meters
pub const BAR_WIDTH: f32 = 0.08;

/// How far from a bar a surface hit may land and still select it
pub const SURFACE_HIT_RADIUS: f32 = 0.15;

/// Colour family of a bar, from the sign of its gain/loss.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceTone {
    Gain,
    Loss,
    Neutral,
}

impl PerformanceTone {
    pub fn from_gain_loss(percent: Decimal) -> Self {
        if percent > Decimal::ZERO {
            PerformanceTone::Gain
        } else if percent < Decimal::ZERO {
            PerformanceTone::Loss
        } else {
            PerformanceTone::Neutral
        }
    }
}

/// Placement of one holding's bar relative to the scene anchor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarLayout {
    pub symbol: String,
    pub row: usize,
    pub column: usize,
    pub x: f32,
    pub z: f32,
    pub height: f32,
    pub label_y: f32,
    pub weight: Decimal,
    pub gain_loss_percent: Decimal,
    pub tone: PerformanceTone,
}

impl BarLayout {
    /// Centre of the bar's volume, relative to the anchor.
    pub fn center(&self) -> ScenePoint {
        ScenePoint::new(self.x, self.height / 2.0, self.z)
    }
}

/// Lays the positions out on a grid of at most four columns, in portfolio
/// order. Bar height grows with the position's share of total value.
pub fn layout_bars(positions: &[Position]) -> Vec<BarLayout> {
    if positions.is_empty() {
        return Vec::new();
    }
    let columns = positions.len().min(MAX_COLUMNS);
    let total: Decimal = positions.iter().map(|p| p.current_value()).sum();

    positions
        .iter()
        .enumerate()
        .map(|(index, position)| {
            let row = index / columns;
            let column = index % columns;
            let x = (column as f32 - columns as f32 / 2.0) * BAR_SPACING;
            let z = row as f32 * BAR_SPACING;

            let weight = value_weight(position, total);
            let height = weight.to_f32().unwrap_or(0.0) * HEIGHT_SCALE + BASE_HEIGHT;
            let gain_loss_percent = position.gain_loss_percent();

            BarLayout {
                symbol: position.ticker_symbol.clone(),
                row,
                column,
                x,
                z,
                height,
                label_y: height + LABEL_OFFSET,
                weight,
                gain_loss_percent,
                tone: PerformanceTone::from_gain_loss(gain_loss_percent),
            }
        })
        .collect()
}

/// The bar closest to `hit` (relative to the anchor), if within
/// [`SURFACE_HIT_RADIUS`].
pub fn nearest_bar<'a>(bars: &'a [BarLayout], hit: &ScenePoint) -> Option<&'a BarLayout> {
    bars.iter()
        .map(|bar| (bar, bar.center().distance(hit)))
        .filter(|(_, distance)| *distance < SURFACE_HIT_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(bar, _)| bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Transaction;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, shares: i64, cost: Decimal, price: Decimal) -> Position {
        let mut position = Position::new(symbol, symbol);
        position.add_transaction(Transaction::buy(shares, cost, Utc::now()));
        position.current_price = price;
        position
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_empty_layout() {
        assert!(layout_bars(&[]).is_empty());
    }

    #[test]
    fn test_heights_follow_value_weight() {
        let positions = vec![
            holding("AAPL", 10, dec!(100), dec!(150)), // 1500
            holding("MSFT", 5, dec!(300), dec!(300)),  // 1500
            holding("TSLA", 10, dec!(250), dec!(200)), // 2000
        ];
        let bars = layout_bars(&positions);

        assert_eq!(bars.len(), 3);
        assert!(approx(bars[0].height, 0.3 * 0.5 + 0.05));
        assert!(approx(bars[2].height, 0.4 * 0.5 + 0.05));
        assert!(approx(bars[2].label_y, bars[2].height + 0.05));

        assert_eq!(bars[0].tone, PerformanceTone::Gain);
        assert_eq!(bars[1].tone, PerformanceTone::Neutral);
        assert_eq!(bars[2].tone, PerformanceTone::Loss);
    }

    #[test]
    fn test_grid_wraps_after_four_columns() {
        let positions: Vec<_> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|s| holding(s, 1, dec!(10), dec!(10)))
            .collect();
        let bars = layout_bars(&positions);

        // Four columns centred on the anchor: -2, -1, 0, 1 spacings
        assert!(approx(bars[0].x, -0.3));
        assert!(approx(bars[3].x, 0.15));
        assert_eq!((bars[4].row, bars[4].column), (1, 0));
        assert!(approx(bars[4].x, -0.3));
        assert!(approx(bars[4].z, 0.15));
    }

    #[test]
    fn test_two_bars_use_two_columns() {
        let positions = vec![
            holding("A", 1, dec!(10), dec!(10)),
            holding("B", 1, dec!(10), dec!(10)),
        ];
        let bars = layout_bars(&positions);
        assert!(approx(bars[0].x, -0.15));
        assert!(approx(bars[1].x, 0.0));
        assert!(bars.iter().all(|b| approx(b.z, 0.0)));
    }

    #[test]
    fn test_worthless_portfolio_gets_base_height() {
        let positions = vec![holding("ZERO", 10, dec!(100), dec!(0))];
        let bars = layout_bars(&positions);
        assert!(approx(bars[0].height, BASE_HEIGHT));
        assert_eq!(bars[0].weight, Decimal::ZERO);
        assert_eq!(bars[0].tone, PerformanceTone::Loss);
    }

    #[test]
    fn test_nearest_bar_within_radius() {
        let positions = vec![
            holding("A", 1, dec!(10), dec!(10)),
            holding("B", 1, dec!(10), dec!(10)),
        ];
        let bars = layout_bars(&positions);

        let near_b = ScenePoint::new(0.02, 0.15, 0.01);
        assert_eq!(nearest_bar(&bars, &near_b).map(|b| b.symbol.as_str()), Some("B"));

        let far = ScenePoint::new(1.0, 0.0, 1.0);
        assert!(nearest_bar(&bars, &far).is_none());
    }
}
