//! Portfolio domain: model, valuation, persistence contract and workflows.

pub mod portfolio_model;
pub mod portfolio_repository;
pub mod portfolio_service;
pub mod portfolio_traits;
pub mod valuation;


pub use portfolio_model::*;
pub use portfolio_repository::InMemoryPortfolioRepository;
pub use portfolio_service::{PortfolioService, RefreshFailure, RefreshSummary};
pub use portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
pub use valuation::{summarize_portfolio, summarize_position, PortfolioValuation, PositionValuation};
