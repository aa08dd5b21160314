//! Extraction of trait attributes and SVG artwork from a sold asset's
//! `token_metadata` data URI (base64 JSON wrapping a base64 SVG).

use serde::Deserialize;
use thiserror::Error;

use crate::datauri::{self, DataUriError};

pub const JSON_METADATA_PREFIX: &str = "data:application/json;base64,";
pub const SVG_IMAGE_PREFIX: &str = "data:image/svg+xml;base64,";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    DataUri(#[from] DataUriError),
    #[error("token metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token metadata has no {0:?} field")]
    MissingField(&'static str),
}

/// The decoded on-chain metadata document.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenMetadata {
    /// Artwork, itself a data URI (SVG for on-chain collections).
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<MetadataAttribute>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MetadataAttribute {
    pub trait_type: String,
    /// Trait values are strings for most collections but numbers are legal.
    pub value: serde_json::Value,
}

impl MetadataAttribute {
    pub fn display_value(&self) -> String {
        match self.value.as_str() {
            Some(s) => s.to_string(),
            None => self.value.to_string(),
        }
    }
}

/// Decode the outer JSON document of a `token_metadata` data URI.
pub fn decode_token_metadata(token_metadata_uri: &str) -> Result<TokenMetadata, MetadataError> {
    let json = datauri::decode(token_metadata_uri, JSON_METADATA_PREFIX)?;
    Ok(serde_json::from_str(&json)?)
}

/// The asset's trait list, in document order.
pub fn extract_attributes(
    token_metadata_uri: &str,
) -> Result<Vec<MetadataAttribute>, MetadataError> {
    decode_token_metadata(token_metadata_uri)?
        .attributes
        .ok_or(MetadataError::MissingField("attributes"))
}

/// The asset's artwork as raw SVG markup, decoded from the nested data URI
/// in the metadata's `image` field.
pub fn extract_svg(token_metadata_uri: &str) -> Result<String, MetadataError> {
    let image = decode_token_metadata(token_metadata_uri)?
        .image
        .ok_or(MetadataError::MissingField("image"))?;
    Ok(datauri::decode(&image, SVG_IMAGE_PREFIX)?)
}
