use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::portfolio_model::{Portfolio, Position, Transaction};
use super::portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::{Error, Result};
use crate::events::{PortfolioEvent, PortfolioEventSink};
use crate::quotes::QuoteClient;

/// Outcome of a bulk price refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub updated: Vec<String>,
    pub failed: Vec<RefreshFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    pub symbol: String,
    pub error: String,
}

impl RefreshSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upper-cased, trimmed ticker. Rejects blanks.
fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(Error::Validation("Symbol cannot be empty".to_string()));
    }
    Ok(symbol)
}

fn ensure_positive_shares(shares: i64) -> Result<()> {
    if shares <= 0 {
        return Err(Error::Validation(format!(
            "Share count must be greater than zero, got {}",
            shares
        )));
    }
    Ok(())
}

fn find_position(portfolio: &Portfolio, symbol: &str) -> Result<Position> {
    portfolio
        .position(symbol)
        .cloned()
        .ok_or_else(|| Error::PositionNotFound(symbol.to_string()))
}

/// Service driving the portfolio workflows.
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    quote_client: Arc<QuoteClient>,
    event_sink: Arc<dyn PortfolioEventSink>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        quote_client: Arc<QuoteClient>,
        event_sink: Arc<dyn PortfolioEventSink>,
    ) -> Self {
        Self {
            repository,
            quote_client,
            event_sink,
        }
    }

    /// Fetches the latest price for `symbol` and stores it on the position.
    async fn refresh_position_quote(&self, portfolio_id: &str, symbol: &str) -> Result<Decimal> {
        let price = self.quote_client.fetch_current_price(symbol).await?;
        self.repository
            .update_position_quote(portfolio_id, symbol, price, Utc::now())
            .await?;
        self.event_sink
            .emit(PortfolioEvent::quote_updated(portfolio_id, symbol, price));
        Ok(price)
    }

    /// Persists a new transaction, then refreshes the position's price.
    ///
    /// The transaction stays recorded even if the price refresh fails.
    async fn commit_transaction(
        &self,
        mut portfolio: Portfolio,
        symbol: &str,
        transaction: Transaction,
    ) -> Result<Position> {
        let transaction_type = transaction.transaction_type;
        let shares = transaction.shares;

        portfolio
            .position_mut(symbol)
            .ok_or_else(|| Error::PositionNotFound(symbol.to_string()))?
            .add_transaction(transaction);
        self.repository.save_portfolio(&portfolio).await?;

        self.event_sink.emit(PortfolioEvent::TransactionRecorded {
            portfolio_id: portfolio.id.clone(),
            symbol: symbol.to_string(),
            transaction_type,
            shares,
        });

        if let Err(e) = self.refresh_position_quote(&portfolio.id, symbol).await {
            warn!(
                "Recorded {:?} of {} but could not refresh its price: {}",
                transaction_type, symbol, e
            );
            return Err(e);
        }

        find_position(&self.repository.get_portfolio(&portfolio.id)?, symbol)
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(&self, client_name: &str) -> Result<Portfolio> {
        let client_name = client_name.trim();
        if client_name.is_empty() {
            return Err(Error::Validation("Client name cannot be empty".to_string()));
        }

        let portfolio = self
            .repository
            .save_portfolio(&Portfolio::new(client_name))
            .await?;
        info!("Created portfolio {} for {}", portfolio.id, portfolio.client_name);

        self.event_sink.emit(PortfolioEvent::PortfolioCreated {
            portfolio_id: portfolio.id.clone(),
        });
        Ok(portfolio)
    }

    fn load_portfolio(&self) -> Result<Option<Portfolio>> {
        Ok(self.repository.list_portfolios()?.into_iter().next())
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.repository.get_portfolio(portfolio_id)
    }

    async fn add_stock(
        &self,
        portfolio_id: &str,
        symbol: &str,
        shares: i64,
        purchase_date: DateTime<Utc>,
    ) -> Result<Position> {
        ensure_positive_shares(shares)?;
        let symbol = normalize_symbol(symbol)?;

        let existing = self.repository.get_portfolio(portfolio_id)?;
        let company_name = match existing.position(&symbol) {
            Some(position) => position.company_name.clone(),
            None => self.quote_client.fetch_company_name(&symbol).await,
        };

        let price = self
            .quote_client
            .fetch_historical_close(&symbol, purchase_date)
            .await?;
        debug!(
            "Buying {} {} at {} (close of {})",
            shares,
            symbol,
            price,
            purchase_date.date_naive()
        );

        // Re-read: the portfolio may have changed while the quotes were in flight
        let mut portfolio = self.repository.get_portfolio(portfolio_id)?;
        if portfolio.position(&symbol).is_none() {
            portfolio.add_position(Position::new(symbol.clone(), company_name));
        }

        self.commit_transaction(
            portfolio,
            &symbol,
            Transaction::buy(shares, price, purchase_date),
        )
        .await
    }

    async fn sell_stock(
        &self,
        portfolio_id: &str,
        symbol: &str,
        shares: i64,
        sale_date: DateTime<Utc>,
    ) -> Result<Position> {
        ensure_positive_shares(shares)?;
        let symbol = normalize_symbol(symbol)?;

        let check_holding = |portfolio: &Portfolio| -> Result<()> {
            let held = find_position(portfolio, &symbol)?.total_shares();
            if held < shares {
                return Err(Error::InsufficientShares {
                    symbol: symbol.clone(),
                    held,
                    requested: shares,
                });
            }
            Ok(())
        };

        check_holding(&self.repository.get_portfolio(portfolio_id)?)?;

        let price = self
            .quote_client
            .fetch_historical_close(&symbol, sale_date)
            .await?;
        debug!(
            "Selling {} {} at {} (close of {})",
            shares,
            symbol,
            price,
            sale_date.date_naive()
        );

        let portfolio = self.repository.get_portfolio(portfolio_id)?;
        check_holding(&portfolio)?;

        self.commit_transaction(
            portfolio,
            &symbol,
            Transaction::sell(shares, price, sale_date),
        )
        .await
    }

    async fn refresh_prices(&self, portfolio_id: &str) -> Result<RefreshSummary> {
        let portfolio = self.repository.get_portfolio(portfolio_id)?;

        let mut seen = HashSet::new();
        let symbols: Vec<&str> = portfolio
            .positions
            .iter()
            .map(|p| p.ticker_symbol.as_str())
            .filter(|s| seen.insert(*s))
            .collect();

        info!(
            "Refreshing prices for {} positions in portfolio {}",
            symbols.len(),
            portfolio_id
        );

        let results = join_all(symbols.iter().map(|symbol| async move {
            (*symbol, self.refresh_position_quote(portfolio_id, symbol).await)
        }))
        .await;

        let mut summary = RefreshSummary::default();
        for (symbol, result) in results {
            match result {
                Ok(price) => {
                    debug!("Refreshed {} at {}", symbol, price);
                    summary.updated.push(symbol.to_string());
                }
                Err(e) => {
                    warn!("Failed to refresh price for {}: {}", symbol, e);
                    summary.failed.push(RefreshFailure {
                        symbol: symbol.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Price refresh done: {} updated, {} failed",
            summary.updated.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn remove_position(&self, portfolio_id: &str, symbol: &str) -> Result<()> {
        let symbol = normalize_symbol(symbol)?;
        let mut portfolio = self.repository.get_portfolio(portfolio_id)?;

        let removed = portfolio
            .remove_position(&symbol)
            .ok_or_else(|| Error::PositionNotFound(symbol.clone()))?;
        self.repository.save_portfolio(&portfolio).await?;
        debug!(
            "Removed {} with {} transactions",
            symbol,
            removed.transactions.len()
        );

        self.event_sink
            .emit(PortfolioEvent::position_removed(portfolio_id, &symbol));
        Ok(())
    }

    async fn remove_transaction(
        &self,
        portfolio_id: &str,
        symbol: &str,
        transaction_id: &str,
    ) -> Result<Position> {
        let symbol = normalize_symbol(symbol)?;
        let mut portfolio = self.repository.get_portfolio(portfolio_id)?;

        let position = portfolio
            .position_mut(&symbol)
            .ok_or_else(|| Error::PositionNotFound(symbol.clone()))?;
        if !position.remove_transaction(transaction_id) {
            return Err(Error::TransactionNotFound(transaction_id.to_string()));
        }
        let position = position.clone();

        self.repository.save_portfolio(&portfolio).await?;
        Ok(position)
    }
}

