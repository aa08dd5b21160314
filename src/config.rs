use std::env;

use thiserror::Error;

/// Default lookback window: the bot is expected to run hourly.
const DEFAULT_LOOKBACK_SECONDS: u64 = 3_600;
const DEFAULT_OPENSEA_API_URL: &str = "https://api.opensea.io";
const DEFAULT_RENDERER_URL: &str = "http://localhost:3000/render";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    MissingVar(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_bot_token: String,
    pub discord_channel_id: String,
    pub collection_slug: String,
    /// Contract to filter the feed by; the shared storefront contract is
    /// special-cased by the poller and never sent upstream.
    pub contract_address: Option<String>,
    /// How far back to look for sales, in seconds.
    pub lookback_seconds: u64,
    pub opensea_api_url: String,
    pub renderer_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            discord_channel_id: required("DISCORD_CHANNEL_ID")?,
            collection_slug: required("COLLECTION_SLUG")?,
            contract_address: env::var("CONTRACT_ADDRESS")
                .ok()
                .filter(|v| !v.is_empty()),
            lookback_seconds: env::var("SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LOOKBACK_SECONDS),
            opensea_api_url: env::var("OPENSEA_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENSEA_API_URL.to_string()),
            renderer_url: env::var("RENDERER_URL")
                .unwrap_or_else(|_| DEFAULT_RENDERER_URL.to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}
