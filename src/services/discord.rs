//! Discord REST client. A run opens one session up front, posts every
//! notification through it, and closes it at the end.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::notification::{Embed, NotificationPayload, ATTACHMENT_FILENAME};

pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("bot token is not a valid header value")]
    InvalidToken,
    #[error("discord request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("discord rejected the bot token ({status}): {body}")]
    Auth { status: u16, body: String },
    #[error("channel {channel_id} lookup failed ({status}): {body}")]
    ChannelLookup {
        channel_id: String,
        status: u16,
        body: String,
    },
    #[error("message delivery failed ({status}): {body}")]
    Send { status: u16, body: String },
    #[error("failed to decode discord response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to encode message payload: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct BotUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    embeds: [&'a Embed; 1],
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelNotifier: Send + Sync {
    /// Posts the embed with its artwork attached.
    async fn send(&self, payload: NotificationPayload) -> Result<(), NotifyError>;
}

/// Entry point for the handshake. Consumed by [`DiscordClient::connect`],
/// which yields the channel handle the dispatcher posts through.
#[derive(Clone, Debug)]
pub struct DiscordClient {
    base_url: String,
}

impl DiscordClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Authenticates the bot and verifies the target channel, returning a
    /// ready-to-send session handle.
    pub async fn connect(
        self,
        token: &str,
        channel_id: &str,
    ) -> Result<DiscordChannel, NotifyError> {
        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(|_| NotifyError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        let http = Client::builder()
            .timeout(CONNECT_TIMEOUT)
            .default_headers(headers)
            .build()
            .expect("reqwest client");

        let response = http
            .get(format!("{}/users/@me", self.base_url))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NotifyError::Auth {
                status: status.as_u16(),
                body,
            });
        }
        let user: BotUser = serde_json::from_str(&body)?;
        info!(username = %user.username, "logged in to discord");

        let response = http
            .get(format!("{}/channels/{channel_id}", self.base_url))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NotifyError::ChannelLookup {
                channel_id: channel_id.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        let channel: ChannelInfo = serde_json::from_str(&body)?;
        info!(
            channel_id,
            channel_name = channel.name.as_deref().unwrap_or("unknown"),
            "watching channel"
        );

        Ok(DiscordChannel {
            http,
            messages_url: format!("{}/channels/{channel_id}/messages", self.base_url),
            channel_id: channel_id.to_string(),
        })
    }
}

/// Authenticated session bound to one channel.
#[derive(Debug)]
pub struct DiscordChannel {
    http: Client,
    messages_url: String,
    channel_id: String,
}

impl DiscordChannel {
    /// Ends the session. The REST API needs no teardown call; this marks
    /// the end of the run in the logs.
    pub fn close(self) {
        debug!(channel_id = %self.channel_id, "discord session closed");
    }
}

#[async_trait]
impl ChannelNotifier for DiscordChannel {
    async fn send(&self, payload: NotificationPayload) -> Result<(), NotifyError> {
        let message = CreateMessage {
            embeds: [&payload.embed],
        };
        let payload_json = serde_json::to_string(&message).map_err(NotifyError::Encode)?;
        let file = Part::bytes(payload.image.bytes)
            .file_name(ATTACHMENT_FILENAME)
            .mime_str(payload.image.format.mime_type())?;
        let form = Form::new()
            .text("payload_json", payload_json)
            .part("files[0]", file);

        let response = self
            .http
            .post(&self.messages_url)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Send {
                status: status.as_u16(),
                body,
            });
        }
        debug!(channel_id = %self.channel_id, "sale notification delivered");
        Ok(())
    }
}
