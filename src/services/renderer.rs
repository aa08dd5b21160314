//! Client for the HTML-to-image rendering service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::raster::RasterImage;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const RENDER_QUALITY: u32 = 1000;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rendering service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("rendering service returned an empty image")]
    EmptyImage,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    #[serde(rename = "type")]
    output_type: &'static str,
    quality: u32,
    #[serde(rename = "puppeteerArgs")]
    puppeteer_args: PuppeteerArgs,
}

#[derive(Debug, Serialize)]
struct PuppeteerArgs {
    args: [&'static str; 2],
}

impl<'a> RenderRequest<'a> {
    fn png(html: &'a str) -> Self {
        Self {
            html,
            output_type: "png",
            quality: RENDER_QUALITY,
            puppeteer_args: PuppeteerArgs {
                args: ["--no-sandbox", "--disable-setuid-sandbox"],
            },
        }
    }
}

/// Centers the artwork on a neutral backdrop and scales it up so the
/// screenshot is legible in the Discord embed.
pub fn wrap_markup(svg: &str) -> String {
    format!(
        "<html>\
         <body style=\"background: whitesmoke;\">\
         <div style=\"transform: translate(68.5%, 62.5%) scale(2);\">{svg}</div>\
         </body>\
         </html>"
    )
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Rasterizes an SVG document to a PNG held in memory.
    async fn rasterize(&self, svg: &str) -> Result<RasterImage, RenderError>;
}

#[derive(Clone, Debug)]
pub struct RenderClient {
    client: Client,
    url: String,
}

impl RenderClient {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Renderer for RenderClient {
    async fn rasterize(&self, svg: &str) -> Result<RasterImage, RenderError> {
        let html = wrap_markup(svg);
        let response = self
            .client
            .post(&self.url)
            .json(&RenderRequest::png(&html))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(RenderError::EmptyImage);
        }
        debug!(bytes = bytes.len(), "rasterized sale artwork");
        Ok(RasterImage::png(bytes.to_vec()))
    }
}
