//! Valuation summaries for display and serialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::valuation_calculator::{
    average_cost, current_value, gain_loss_percent, portfolio_total_value, total_shares,
    value_weight,
};
use crate::portfolio::{Portfolio, Position};

/// Derived numbers for one position at a point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub ticker_symbol: String,
    pub company_name: String,
    pub total_shares: i64,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub gain_loss_percent: Decimal,
    /// Share of the portfolio's total value (0..1 for long-only portfolios)
    pub weight: Decimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub portfolio_id: String,
    pub client_name: String,
    pub total_value: Decimal,
    pub positions: Vec<PositionValuation>,
    pub calculated_at: DateTime<Utc>,
}

pub fn summarize_position(position: &Position, portfolio_total: Decimal) -> PositionValuation {
    PositionValuation {
        ticker_symbol: position.ticker_symbol.clone(),
        company_name: position.company_name.clone(),
        total_shares: total_shares(position),
        average_cost: average_cost(position),
        current_price: position.current_price,
        current_value: current_value(position),
        gain_loss_percent: gain_loss_percent(position),
        weight: value_weight(position, portfolio_total),
        last_updated: position.last_updated,
    }
}

pub fn summarize_portfolio(portfolio: &Portfolio) -> PortfolioValuation {
    let total_value = portfolio_total_value(portfolio);
    PortfolioValuation {
        portfolio_id: portfolio.id.clone(),
        client_name: portfolio.client_name.clone(),
        total_value,
        positions: portfolio
            .positions
            .iter()
            .map(|p| summarize_position(p, total_value))
            .collect(),
        calculated_at: Utc::now(),
    }
}
