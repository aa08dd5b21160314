//! Decoding for base64 data URIs (`data:<media-type>;base64,<payload>`).
//!
//! On-chain token metadata embeds its JSON document and SVG artwork this way
//! instead of hosting them, so everything downstream starts here.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataUriError {
    #[error("data URI is missing the expected prefix {prefix:?}")]
    MissingPrefix { prefix: String },
    #[error("data URI payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("data URI payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Decode the payload after `expected_prefix` into UTF-8 text.
///
/// The base64 payload is decoded to raw bytes first and then validated as
/// UTF-8, which recovers multi-byte characters (trait names are not plain
/// ASCII for every collection).
pub fn decode(data_uri: &str, expected_prefix: &str) -> Result<String, DataUriError> {
    let (_, payload) = data_uri
        .split_once(expected_prefix)
        .ok_or_else(|| DataUriError::MissingPrefix {
            prefix: expected_prefix.to_string(),
        })?;
    let bytes = general_purpose::STANDARD.decode(payload)?;
    Ok(String::from_utf8(bytes)?)
}
