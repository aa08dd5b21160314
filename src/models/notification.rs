//! The outbound Discord message: embed wire structs and the composer that
//! maps one sale (plus its decoded metadata and rendered artwork) into them.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use crate::metadata::MetadataAttribute;
use crate::models::raster::RasterImage;
use crate::models::sale::SaleEvent;
use crate::utils::date::parse_feed_timestamp;
use crate::utils::ether::{format_ether, ETHER_SYMBOL};

/// Attachment name referenced from the embed as `attachment://sale.png`.
pub const ATTACHMENT_FILENAME: &str = "sale.png";

const EMBED_COLOR: u32 = 0x0099ff;
/// Discord rejects embeds with more than 25 fields.
const EMBED_FIELD_LIMIT: usize = 25;
const STANDARD_FIELD_COUNT: usize = 4;
const AUTHOR_NAME: &str = "OpenSea Bot";
const AUTHOR_URL: &str = "https://github.com/sbauch/opensea-discord-bot";
const FOOTER_TEXT: &str = "Sold on OpenSea";
const OPENSEA_LOGO_URL: &str =
    "https://files.readme.io/566c72b-opensea-logomark-full-colored.png";
/// Marker for addresses the feed did not supply; never an error.
const MISSING_ADDRESS: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Embed {
    pub color: u32,
    pub title: String,
    pub url: String,
    pub author: EmbedAuthor,
    pub thumbnail: EmbedThumbnail,
    pub fields: Vec<EmbedField>,
    pub image: EmbedImage,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub footer: EmbedFooter,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    /// Link wrapped around the author name.
    pub url: String,
    pub icon_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

/// One outbound message: the embed plus its image attachment. Built fresh
/// per sale and consumed by a single channel send.
#[derive(Clone, Debug)]
pub struct NotificationPayload {
    pub embed: Embed,
    pub image: RasterImage,
}

impl NotificationPayload {
    /// Map a sale into the message to post. Pure aside from the send-time
    /// fallback for timestamps the feed garbled.
    pub fn compose(
        sale: &SaleEvent,
        attributes: Vec<MetadataAttribute>,
        image: RasterImage,
    ) -> Self {
        let amount = format!(
            "{}{ETHER_SYMBOL}",
            format_ether(sale.total_price.as_deref().unwrap_or("0"))
        );

        let mut fields = vec![
            EmbedField::new("Name", &sale.asset.name),
            EmbedField::new("Amount", amount),
            EmbedField::new("Buyer", sale.buyer_address().unwrap_or(MISSING_ADDRESS)),
            EmbedField::new("Seller", sale.seller_address().unwrap_or(MISSING_ADDRESS)),
        ];
        for attribute in attributes
            .into_iter()
            .take(EMBED_FIELD_LIMIT - STANDARD_FIELD_COUNT)
        {
            let value = attribute.display_value();
            fields.push(EmbedField::new(attribute.trait_type, value));
        }

        let timestamp = parse_feed_timestamp(&sale.created_date).unwrap_or_else(|err| {
            warn!(
                created_date = %sale.created_date,
                error = %err,
                "unparsable sale timestamp, falling back to send time"
            );
            Utc::now()
        });

        Self {
            embed: Embed {
                color: EMBED_COLOR,
                title: format!("{} sold!", sale.asset.name),
                url: sale.asset.permalink.clone(),
                author: EmbedAuthor {
                    name: AUTHOR_NAME.to_string(),
                    url: AUTHOR_URL.to_string(),
                    icon_url: OPENSEA_LOGO_URL.to_string(),
                },
                thumbnail: EmbedThumbnail {
                    url: sale.asset.collection.image_url.clone(),
                },
                fields,
                image: EmbedImage {
                    url: format!("attachment://{ATTACHMENT_FILENAME}"),
                },
                timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                footer: EmbedFooter {
                    text: FOOTER_TEXT.to_string(),
                    icon_url: OPENSEA_LOGO_URL.to_string(),
                },
            },
            image,
        }
    }
}
