//! Portfolio domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::valuation::valuation_calculator as calc;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    Buy,
    Sell,
}

/// One buy or sell event. Share count is signed: positive for buys,
/// negative for sells.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub shares: i64,
    pub price_per_share: Decimal,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Builds a transaction exactly as given. Kind and sign are not
    /// reconciled here.
    pub fn new(
        shares: i64,
        price_per_share: Decimal,
        date: DateTime<Utc>,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shares,
            price_per_share,
            date,
            transaction_type,
        }
    }

    pub fn buy(shares: i64, price_per_share: Decimal, date: DateTime<Utc>) -> Self {
        Self::new(shares.abs(), price_per_share, date, TransactionType::Buy)
    }

    pub fn sell(shares: i64, price_per_share: Decimal, date: DateTime<Utc>) -> Self {
        Self::new(-shares.abs(), price_per_share, date, TransactionType::Sell)
    }

    /// Signed cash amount of the trade (price × signed shares).
    pub fn amount(&self) -> Decimal {
        self.price_per_share * Decimal::from(self.shares)
    }
}

/// A holding of one ticker inside a portfolio.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub ticker_symbol: String,
    pub company_name: String,
    pub transactions: Vec<Transaction>,
    pub current_price: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl Position {
    pub fn new(ticker_symbol: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticker_symbol: ticker_symbol.into(),
            company_name: company_name.into(),
            transactions: Vec::new(),
            current_price: Decimal::ZERO,
            last_updated: Utc::now(),
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Removes a transaction by id. Returns false if it was not present.
    pub fn remove_transaction(&mut self, transaction_id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != transaction_id);
        self.transactions.len() != before
    }

    pub fn update_quote(&mut self, price: Decimal, at: DateTime<Utc>) {
        self.current_price = price;
        self.last_updated = at;
    }

    pub fn total_shares(&self) -> i64 {
        calc::total_shares(self)
    }

    pub fn average_cost(&self) -> Decimal {
        calc::average_cost(self)
    }

    pub fn current_value(&self) -> Decimal {
        calc::current_value(self)
    }

    pub fn gain_loss_percent(&self) -> Decimal {
        calc::gain_loss_percent(self)
    }
}

/// A client's set of holdings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub client_name: String,
    pub positions: Vec<Position>,
    pub created_date: DateTime<Utc>,
}

impl Portfolio {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: client_name.into(),
            positions: Vec::new(),
            created_date: Utc::now(),
        }
    }

    pub fn add_position(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// Removes every position with the given symbol, returning the first.
    pub fn remove_position(&mut self, ticker_symbol: &str) -> Option<Position> {
        let idx = self
            .positions
            .iter()
            .position(|p| p.ticker_symbol == ticker_symbol)?;
        let removed = self.positions.remove(idx);
        self.positions.retain(|p| p.ticker_symbol != ticker_symbol);
        Some(removed)
    }

    pub fn position(&self, ticker_symbol: &str) -> Option<&Position> {
        self.positions
            .iter()
            .find(|p| p.ticker_symbol == ticker_symbol)
    }

    pub fn position_mut(&mut self, ticker_symbol: &str) -> Option<&mut Position> {
        self.positions
            .iter_mut()
            .find(|p| p.ticker_symbol == ticker_symbol)
    }

    pub fn total_value(&self) -> Decimal {
        calc::portfolio_total_value(self)
    }

    pub fn composition(&self) -> HashMap<String, i64> {
        calc::portfolio_composition(self)
    }

    pub fn value_distribution(&self) -> HashMap<String, Decimal> {
        calc::portfolio_value_distribution(self)
    }
}
