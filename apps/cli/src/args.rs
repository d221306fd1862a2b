use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use stockfolio_core::charts::ChartTimeframe;

#[derive(Parser)]
#[command(author, version, about = "Track a stock portfolio from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a portfolio for a client
    Init {
        /// Client or portfolio display name
        name: String,
    },

    /// Show holdings, value and gain/loss
    Summary {
        /// Print the valuation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Buy shares at the close of a date
    Add {
        symbol: String,
        shares: i64,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Sell shares at the close of a date
    Sell {
        symbol: String,
        shares: i64,
        /// Sale date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Fetch current prices for every holding
    Refresh,

    /// Print a holding's price history
    Chart {
        symbol: String,
        /// One of 1D, 1W, 1M, 3M, 1Y, ALL
        #[arg(long, default_value = "1M")]
        timeframe: ChartTimeframe,
    },

    /// Print the 3D bar layout of the holdings
    Bars,

    /// Remove a holding and its transactions
    Remove { symbol: String },
}
