//! Outbound chat notifications
//!
//! The poll loop only needs "deliver this text to the configured chat". The
//! [`Notifier`] trait is that seam; [`TelegramNotifier`] implements it with the
//! Bot API's `sendMessage` method.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Maximum message length accepted by the Bot API, in characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Destination for notification text
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the destination
    ///
    /// # Errors
    ///
    /// Returns [`Error::Delivery`] if the destination rejected the message or
    /// could not be reached.
    async fn send(&self, text: &str) -> Result<()>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API notifier bound to a single chat
pub struct TelegramNotifier {
    http_client: reqwest::Client,

    /// Full `sendMessage` URL, token included
    send_url: String,

    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id`
    ///
    /// # Arguments
    /// * `api_url` - Bot API base URL, e.g. `https://api.telegram.org`
    /// * `token` - Bot token
    /// * `chat_id` - Destination chat
    /// * `timeout` - Upper bound on a single request
    pub fn new(
        api_url: &str,
        token: &str,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Delivery(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            send_url: format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token),
            chat_id: chat_id.into(),
        })
    }

    async fn send_chunk(&self, text: &str) -> Result<()> {
        let response = self
            .http_client
            .post(&self.send_url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            // The URL embeds the bot token; keep it out of error messages
            .map_err(|e| {
                Error::Delivery(format!("sendMessage request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body: BotApiResponse = response.json().await.map_err(|_| {
            Error::Delivery(format!(
                "sendMessage returned HTTP {} with an unreadable body",
                status.as_u16()
            ))
        })?;

        if !body.ok {
            return Err(Error::Delivery(
                body.description.unwrap_or_else(|| {
                    format!("sendMessage failed with HTTP {}", status.as_u16())
                }),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        for chunk in split_message(text) {
            self.send_chunk(&chunk).await?;
        }
        info!(chat_id = %self.chat_id, message = %text, "message delivered");
        Ok(())
    }
}

/// Split text into pieces the Bot API accepts
fn split_message(text: &str) -> Vec<String> {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    let chunks: Vec<String> = chars
        .chunks(MAX_MESSAGE_CHARS)
        .map(|chunk| chunk.iter().collect())
        .collect();
    debug!(parts = chunks.len(), "splitting long message");
    chunks
}
