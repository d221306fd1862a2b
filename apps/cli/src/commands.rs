use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use stockfolio_core::charts::{ChartSession, ChartTimeframe};
use stockfolio_core::events::PortfolioEvent;
use stockfolio_core::portfolio::{summarize_portfolio, Portfolio};
use stockfolio_core::scene::layout_bars;
use stockfolio_core::utils::format::{format_currency, format_percent, format_short_date};
use stockfolio_core::utils::time_utils::DEFAULT_MARKET_TZ;

use crate::args::Command;
use crate::main_lib::AppState;

/// Market close, local time
const MARKET_CLOSE_HOUR: u32 = 16;

pub async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init { name } => init(state, &name).await,
        Command::Summary { json } => summary(state, json),
        Command::Add {
            symbol,
            shares,
            date,
        } => add(state, &symbol, shares, date).await,
        Command::Sell {
            symbol,
            shares,
            date,
        } => sell(state, &symbol, shares, date).await,
        Command::Refresh => refresh(state).await,
        Command::Chart { symbol, timeframe } => chart(state, &symbol, timeframe).await,
        Command::Bars => bars(state),
        Command::Remove { symbol } => remove(state, &symbol).await,
    }
}

fn current_portfolio(state: &AppState) -> anyhow::Result<Portfolio> {
    state
        .portfolio_service
        .load_portfolio()?
        .context("No portfolio yet. Run `stockfolio init <name>` first")
}

/// The market close of `date`, or now when no date is given.
fn trade_instant(date: Option<NaiveDate>) -> DateTime<Utc> {
    let Some(date) = date else {
        return Utc::now();
    };
    let close = date.and_time(NaiveTime::from_hms_opt(MARKET_CLOSE_HOUR, 0, 0).unwrap_or_default());
    DEFAULT_MARKET_TZ
        .from_local_datetime(&close)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&close))
}

async fn init(state: &AppState, name: &str) -> anyhow::Result<()> {
    if let Some(existing) = state.portfolio_service.load_portfolio()? {
        anyhow::bail!(
            "A portfolio for {} already exists ({}). Remove {} to start over",
            existing.client_name,
            existing.id,
            state.store.path().display()
        );
    }
    let portfolio = state.portfolio_service.create_portfolio(name).await?;
    println!("Created portfolio {} ({})", portfolio.client_name, portfolio.id);
    Ok(())
}

fn summary(state: &AppState, json: bool) -> anyhow::Result<()> {
    let valuation = summarize_portfolio(&current_portfolio(state)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&valuation)?);
        return Ok(());
    }

    println!(
        "{}  total {}",
        valuation.client_name,
        format_currency(valuation.total_value)
    );
    if valuation.positions.is_empty() {
        println!("  (no holdings)");
    }
    for p in &valuation.positions {
        println!(
            "  {:<6} {:>6} sh  avg {:>12}  last {:>12}  value {:>14}  {:>9}  updated {}",
            p.ticker_symbol,
            p.total_shares,
            format_currency(p.average_cost),
            format_currency(p.current_price),
            format_currency(p.current_value),
            format_percent(p.gain_loss_percent),
            format_short_date(p.last_updated),
        );
    }
    Ok(())
}

async fn add(
    state: &AppState,
    symbol: &str,
    shares: i64,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let portfolio = current_portfolio(state)?;
    let position = state
        .portfolio_service
        .add_stock(&portfolio.id, symbol, shares, trade_instant(date))
        .await?;
    println!(
        "Bought {} {} ({}); now {} shares at avg {}",
        shares,
        position.ticker_symbol,
        position.company_name,
        position.total_shares(),
        format_currency(position.average_cost())
    );
    Ok(())
}

async fn sell(
    state: &AppState,
    symbol: &str,
    shares: i64,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let portfolio = current_portfolio(state)?;
    let position = state
        .portfolio_service
        .sell_stock(&portfolio.id, symbol, shares, trade_instant(date))
        .await?;
    println!(
        "Sold {} {}; {} shares left",
        shares,
        position.ticker_symbol,
        position.total_shares()
    );
    Ok(())
}

async fn refresh(state: &AppState) -> anyhow::Result<()> {
    let portfolio = current_portfolio(state)?;

    let subscription = state.event_hub.subscribe(|event| {
        if let PortfolioEvent::QuoteUpdated { symbol, price, .. } = event {
            println!("  {:<6} {}", symbol, format_currency(*price));
        }
    });
    let result = state.portfolio_service.refresh_prices(&portfolio.id).await;
    state.event_hub.unsubscribe(subscription);

    let summary = result?;
    for failure in &summary.failed {
        println!("  {:<6} failed: {}", failure.symbol, failure.error);
    }
    println!(
        "Refreshed {} of {} holdings",
        summary.updated.len(),
        summary.updated.len() + summary.failed.len()
    );
    Ok(())
}

async fn chart(state: &AppState, symbol: &str, timeframe: ChartTimeframe) -> anyhow::Result<()> {
    let portfolio = current_portfolio(state)?;
    let symbol = symbol.trim().to_uppercase();
    let position = portfolio
        .position(&symbol)
        .cloned()
        .with_context(|| format!("No holding for {}", symbol))?;

    let session = ChartSession::new(position, Arc::clone(&state.chart_builder), timeframe);
    session.load().await;
    let view = session.view();

    if let Some(error) = &view.error_message {
        anyhow::bail!("{}: {}", symbol, error);
    }

    println!("{} {}", symbol, timeframe);
    for point in &view.points {
        println!(
            "  {:>10}  {:>12}{}",
            timeframe.axis_label(point.date),
            format_currency(point.price),
            if point.synthetic { "  *" } else { "" }
        );
    }
    let range = view.price_range();
    println!(
        "Change {} ({})  range {} - {}",
        format_currency(view.price_change()),
        format_percent(view.selected_percent_change() * rust_decimal::Decimal::ONE_HUNDRED),
        format_currency(*range.start()),
        format_currency(*range.end())
    );
    if view.has_synthetic_points() {
        println!("* estimated: the quote provider did not supply this point");
    }
    Ok(())
}

fn bars(state: &AppState) -> anyhow::Result<()> {
    let portfolio = current_portfolio(state)?;
    for bar in layout_bars(&portfolio.positions) {
        println!(
            "  {:<6} row {} col {}  x {:+.3} z {:+.3}  height {:.3}  {:?}",
            bar.symbol, bar.row, bar.column, bar.x, bar.z, bar.height, bar.tone
        );
    }
    Ok(())
}

async fn remove(state: &AppState, symbol: &str) -> anyhow::Result<()> {
    let portfolio = current_portfolio(state)?;
    state
        .portfolio_service
        .remove_position(&portfolio.id, symbol)
        .await?;
    println!("Removed {}", symbol.trim().to_uppercase());
    Ok(())
}
