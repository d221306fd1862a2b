mod args;
mod commands;
mod config;
mod main_lib;
mod store;

use args::Cli;
use clap::Parser;
use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing();

    let state = build_state(&config)?;

    let result = commands::run(&state, cli.command).await;
    // Save even on failure: a purchase can be recorded before a later step fails
    state.store.save(&state.repository)?;
    result
}
