use std::sync::Arc;

use stockfolio_core::charts::{ChartConfig, ChartSeriesBuilder};
use stockfolio_core::events::{EventHub, PortfolioEventSink};
use stockfolio_core::portfolio::{InMemoryPortfolioRepository, PortfolioService, PortfolioServiceTrait};
use stockfolio_core::quotes::QuoteClient;
use stockfolio_market_data::AlphaVantageProvider;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::store::SnapshotStore;

pub struct AppState {
    pub repository: Arc<InMemoryPortfolioRepository>,
    pub store: SnapshotStore,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub chart_builder: Arc<ChartSeriesBuilder>,
    pub event_hub: EventHub,
}

pub fn init_tracing() {
    let log_format = std::env::var("SF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    if config.alpha_vantage_api_key.is_empty() {
        tracing::warn!("SF_ALPHA_VANTAGE_API_KEY is not set; quote requests will be rejected");
    }

    let mut provider = AlphaVantageProvider::with_timeout(
        config.alpha_vantage_api_key.clone(),
        config.request_timeout,
    );
    if let Some(base_url) = &config.quote_base_url {
        tracing::info!("Using quote endpoint {}", base_url);
        provider = provider.with_base_url(base_url.clone());
    }
    let quote_client = Arc::new(QuoteClient::new(Arc::new(provider)));

    let store = SnapshotStore::new(config.portfolio_path.clone());
    let repository = Arc::new(store.load()?);
    tracing::info!("Portfolio file in use: {}", store.path().display());

    let event_hub = EventHub::new();
    event_hub.subscribe(|event| match serde_json::to_string(event) {
        Ok(json) => tracing::debug!(target: "stockfolio::events", "{}", json),
        Err(e) => tracing::warn!("Could not serialize event: {}", e),
    });
    let event_sink: Arc<dyn PortfolioEventSink> = Arc::new(event_hub.clone());

    let portfolio_service: Arc<dyn PortfolioServiceTrait> = Arc::new(PortfolioService::new(
        repository.clone(),
        quote_client.clone(),
        event_sink,
    ));
    let chart_builder = Arc::new(ChartSeriesBuilder::new(
        quote_client,
        ChartConfig {
            request_delay: config.request_delay,
        },
    ));

    Ok(AppState {
        repository,
        store,
        portfolio_service,
        chart_builder,
        event_hub,
    })
}
