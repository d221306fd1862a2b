//! In-memory portfolio repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::portfolio_model::Portfolio;
use super::portfolio_traits::PortfolioRepositoryTrait;
use crate::errors::{Error, Result};

/// Keeps portfolios in insertion order behind a lock. Used by tests and as
/// the working set of the CLI's snapshot file.
#[derive(Debug, Default)]
pub struct InMemoryPortfolioRepository {
    portfolios: RwLock<Vec<Portfolio>>,
}

impl InMemoryPortfolioRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_portfolios(portfolios: Vec<Portfolio>) -> Self {
        Self {
            portfolios: RwLock::new(portfolios),
        }
    }

    /// Copy of everything stored, for writing out a snapshot.
    pub fn snapshot(&self) -> Result<Vec<Portfolio>> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Portfolio>>> {
        self.portfolios
            .read()
            .map_err(|e| Error::Repository(format!("Portfolio store lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Portfolio>>> {
        self.portfolios
            .write()
            .map_err(|e| Error::Repository(format!("Portfolio store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for InMemoryPortfolioRepository {
    fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.snapshot()
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.read()?
            .iter()
            .find(|p| p.id == portfolio_id)
            .cloned()
            .ok_or_else(|| Error::PortfolioNotFound(portfolio_id.to_string()))
    }

    async fn save_portfolio(&self, portfolio: &Portfolio) -> Result<Portfolio> {
        let mut portfolios = self.write()?;
        match portfolios.iter_mut().find(|p| p.id == portfolio.id) {
            Some(existing) => *existing = portfolio.clone(),
            None => portfolios.push(portfolio.clone()),
        }
        Ok(portfolio.clone())
    }

    async fn update_position_quote(
        &self,
        portfolio_id: &str,
        symbol: &str,
        price: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut portfolios = self.write()?;
        let portfolio = portfolios
            .iter_mut()
            .find(|p| p.id == portfolio_id)
            .ok_or_else(|| Error::PortfolioNotFound(portfolio_id.to_string()))?;

        let mut matched = false;
        for position in portfolio
            .positions
            .iter_mut()
            .filter(|p| p.ticker_symbol == symbol)
        {
            position.update_quote(price, updated_at);
            matched = true;
        }

        if matched {
            Ok(())
        } else {
            Err(Error::PositionNotFound(symbol.to_string()))
        }
    }

    async fn delete_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut portfolios = self.write()?;
        let before = portfolios.len();
        portfolios.retain(|p| p.id != portfolio_id);
        Ok(before - portfolios.len())
    }
}
