//! Sale records as served by the OpenSea v1 events feed.

use serde::Deserialize;

/// Response envelope of `GET /api/v1/events` (sales come newest first).
#[derive(Clone, Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub asset_events: Vec<SaleEvent>,
}

/// One completed sale. Owned by the dispatcher for a single processing pass.
#[derive(Clone, Debug, Deserialize)]
pub struct SaleEvent {
    pub asset: Asset,
    /// Sale price in wei, as a decimal string.
    #[serde(default)]
    pub total_price: Option<String>,
    #[serde(default)]
    pub winner_account: Option<Account>,
    #[serde(default)]
    pub seller: Option<Account>,
    /// Naive UTC timestamp; the feed omits the zone designator.
    pub created_date: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Asset {
    pub name: String,
    pub permalink: String,
    /// Data URI carrying the on-chain metadata document.
    #[serde(default)]
    pub token_metadata: String,
    pub collection: Collection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Collection {
    pub image_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub address: Option<String>,
}

impl SaleEvent {
    pub fn buyer_address(&self) -> Option<&str> {
        self.winner_account.as_ref().and_then(|a| a.address.as_deref())
    }

    pub fn seller_address(&self) -> Option<&str> {
        self.seller.as_ref().and_then(|a| a.address.as_deref())
    }
}
