//! Typed client for the OpenSea v1 events feed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::sale::{EventsResponse, SaleEvent};

/// Contract many unrelated collections mint through. Filtering the feed by
/// it would drop sales, so the query never sends it.
pub const OPENSEA_SHARED_STOREFRONT_ADDRESS: &str =
    "0x495f947276749Ce646f68AC8c248420045cb7b5e";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Feed failures are fatal for the whole run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("events request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("events endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode events response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Selection for one polling pass.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedQuery {
    /// Unix seconds; only sales after this instant are returned.
    pub occurred_after: i64,
    pub collection_slug: String,
    pub contract_address: Option<String>,
}

impl FeedQuery {
    /// Query parameters sent upstream.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("offset", "0".to_string()),
            ("event_type", "successful".to_string()),
            ("only_opensea", "false".to_string()),
            ("occurred_after", self.occurred_after.to_string()),
            ("collection_slug", self.collection_slug.clone()),
        ];
        if let Some(address) = &self.contract_address {
            if !is_shared_storefront(address) {
                params.push(("asset_contract_address", address.clone()));
            }
        }
        params
    }
}

pub fn is_shared_storefront(address: &str) -> bool {
    address.eq_ignore_ascii_case(OPENSEA_SHARED_STOREFRONT_ADDRESS)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SalesFeed: Send + Sync {
    /// Completed sales matching the query, oldest first.
    async fn fetch_sales_since(&self, query: &FeedQuery) -> Result<Vec<SaleEvent>, FeedError>;
}

#[derive(Clone, Debug)]
pub struct OpenSeaClient {
    client: Client,
    base_url: String,
}

impl OpenSeaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SalesFeed for OpenSeaClient {
    async fn fetch_sales_since(&self, query: &FeedQuery) -> Result<Vec<SaleEvent>, FeedError> {
        let url = format!("{}/api/v1/events", self.base_url);
        let response = self.client.get(&url).query(&query.params()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let decoded: EventsResponse = serde_json::from_str(&body)?;

        // The feed serves newest first; notifications go out in
        // chronological order.
        let mut sales = decoded.asset_events;
        sales.reverse();
        debug!(count = sales.len(), "fetched sales from feed");
        Ok(sales)
    }
}
