//! Pure valuation functions over positions and portfolios.
//!
//! Every derived number in the application comes from here. Nothing is
//! cached: callers recompute from the transaction history each time.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::portfolio::{Portfolio, Position};

/// Signed sum of share counts. Sells exceeding buys give a negative total.
pub fn total_shares(position: &Position) -> i64 {
    position.transactions.iter().map(|t| t.shares).sum()
}

/// Accumulated signed cost divided by the net share count.
///
/// Sells enter both sums with their own execution price, so this is neither
/// FIFO nor a buys-only weighted average. Historical gain/loss figures depend
/// on this exact formula.
pub fn average_cost(position: &Position) -> Decimal {
    let cost: Decimal = position.transactions.iter().map(|t| t.amount()).sum();
    let shares = total_shares(position);

    if shares > 0 {
        cost / Decimal::from(shares)
    } else {
        Decimal::ZERO
    }
}

pub fn current_value(position: &Position) -> Decimal {
    position.current_price * Decimal::from(total_shares(position))
}

/// Percentage change of the current price over the average cost.
/// Zero when there is no positive cost basis.
pub fn gain_loss_percent(position: &Position) -> Decimal {
    let avg_price = average_cost(position);
    if avg_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((position.current_price - avg_price) / avg_price) * Decimal::ONE_HUNDRED
}

pub fn portfolio_total_value(portfolio: &Portfolio) -> Decimal {
    portfolio.positions.iter().map(current_value).sum()
}

/// Shares held per symbol. Later positions overwrite earlier ones with the
/// same symbol.
pub fn portfolio_composition(portfolio: &Portfolio) -> HashMap<String, i64> {
    let mut comp = HashMap::with_capacity(portfolio.positions.len());
    for position in &portfolio.positions {
        comp.insert(position.ticker_symbol.clone(), total_shares(position));
    }
    comp
}

/// Current value per symbol, last write wins on duplicate symbols.
pub fn portfolio_value_distribution(portfolio: &Portfolio) -> HashMap<String, Decimal> {
    let mut dist = HashMap::with_capacity(portfolio.positions.len());
    for position in &portfolio.positions {
        dist.insert(position.ticker_symbol.clone(), current_value(position));
    }
    dist
}

/// Fraction of `total` held in this position; zero for a non-positive total.
pub fn value_weight(position: &Position, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    current_value(position) / total
}
