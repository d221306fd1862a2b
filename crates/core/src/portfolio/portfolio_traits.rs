//! Portfolio repository and service traits.
//!
//! These traits define the contract for portfolio operations without any
//! storage-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::portfolio_model::{Portfolio, Position};
use super::portfolio_service::RefreshSummary;
use crate::errors::Result;

/// Trait defining the contract for Portfolio repository operations.
///
/// Writes commit one portfolio (or one position's quote) at a time; the last
/// write wins.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Lists portfolios in creation order.
    fn list_portfolios(&self) -> Result<Vec<Portfolio>>;

    /// Retrieves a portfolio by its ID.
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    /// Inserts or replaces a portfolio, positions and transactions included.
    async fn save_portfolio(&self, portfolio: &Portfolio) -> Result<Portfolio>;

    /// Updates the quoted price of every position with `symbol`.
    async fn update_position_quote(
        &self,
        portfolio_id: &str,
        symbol: &str,
        price: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Deletes a portfolio and everything it owns.
    ///
    /// Returns the number of deleted records.
    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<usize>;
}

/// Trait defining the contract for the portfolio workflows.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn create_portfolio(&self, client_name: &str) -> Result<Portfolio>;

    /// The first stored portfolio, if any.
    fn load_portfolio(&self) -> Result<Option<Portfolio>>;

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    /// Records a purchase at the close of `purchase_date`, then refreshes the
    /// position's current price.
    async fn add_stock(
        &self,
        portfolio_id: &str,
        symbol: &str,
        shares: i64,
        purchase_date: DateTime<Utc>,
    ) -> Result<Position>;

    /// Records a sale at the close of `sale_date`, then refreshes the
    /// position's current price.
    async fn sell_stock(
        &self,
        portfolio_id: &str,
        symbol: &str,
        shares: i64,
        sale_date: DateTime<Utc>,
    ) -> Result<Position>;

    /// Refreshes every position's price concurrently. Individual failures are
    /// reported in the summary.
    async fn refresh_prices(&self, portfolio_id: &str) -> Result<RefreshSummary>;

    async fn remove_position(&self, portfolio_id: &str, symbol: &str) -> Result<()>;

    async fn remove_transaction(
        &self,
        portfolio_id: &str,
        symbol: &str,
        transaction_id: &str,
    ) -> Result<Position>;
}
