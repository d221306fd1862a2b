use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_PORTFOLIO_PATH: &str = "./portfolio.json";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_REQUEST_DELAY_MS: u64 = 200;

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub alpha_vantage_api_key: String,
    pub portfolio_path: PathBuf,
    pub request_timeout: Duration,
    pub request_delay: Duration,
    pub quote_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let alpha_vantage_api_key = std::env::var("SF_ALPHA_VANTAGE_API_KEY").unwrap_or_default();
        let portfolio_path: PathBuf = std::env::var("SF_PORTFOLIO_PATH")
            .unwrap_or_else(|_| DEFAULT_PORTFOLIO_PATH.to_string())
            .into();
        let request_timeout = Duration::from_millis(millis_from_env(
            "SF_REQUEST_TIMEOUT_MS",
            DEFAULT_REQUEST_TIMEOUT_MS,
        )?);
        let request_delay = Duration::from_millis(millis_from_env(
            "SF_REQUEST_DELAY_MS",
            DEFAULT_REQUEST_DELAY_MS,
        )?);
        let quote_base_url = std::env::var("SF_QUOTE_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(Self {
            alpha_vantage_api_key,
            portfolio_path,
            request_timeout,
            request_delay,
            quote_base_url,
        })
    }
}

fn millis_from_env(key: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of milliseconds, got {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
