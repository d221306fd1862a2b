//! Portfolio event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::TransactionType;

/// Events emitted after a successful mutation or state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PortfolioEvent {
    PortfolioCreated {
        portfolio_id: String,
    },

    /// A buy or sell was appended to a position.
    TransactionRecorded {
        portfolio_id: String,
        symbol: String,
        transaction_type: TransactionType,
        shares: i64,
    },

    /// A position's quoted price was refreshed.
    QuoteUpdated {
        portfolio_id: String,
        symbol: String,
        price: Decimal,
    },

    PositionRemoved {
        portfolio_id: String,
        symbol: String,
    },

    /// The scene selection changed. `symbol` is None once cleared.
    SelectionChanged {
        symbol: Option<String>,
        showing_detail: bool,
    },
}

impl PortfolioEvent {
    pub fn quote_updated(portfolio_id: &str, symbol: &str, price: Decimal) -> Self {
        PortfolioEvent::QuoteUpdated {
            portfolio_id: portfolio_id.to_string(),
            symbol: symbol.to_string(),
            price,
        }
    }

    pub fn position_removed(portfolio_id: &str, symbol: &str) -> Self {
        PortfolioEvent::PositionRemoved {
            portfolio_id: portfolio_id.to_string(),
            symbol: symbol.to_string(),
        }
    }
}
