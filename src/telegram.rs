//! Channel publisher - Telegram message delivery with rate-limit handling.
//!
//! One network call per attempt. A 429 from Telegram is not an error here:
//! the publisher sleeps for the server-supplied retry-after (10 s when the
//! response does not carry one) and retries the same send in a loop, as many
//! times as the platform demands. Every other failure propagates to the
//! caller, which decides whether to retry on a later pass.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::PublishError;

/// Production Telegram Bot API endpoint.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(10);

// A hung request would otherwise stall the whole reconciliation pass.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API error envelope, as much of it as we read.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// Sends formatted announcements to a Telegram channel.
pub struct TelegramPublisher {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramPublisher {
    /// Create a publisher against a given API base URL.
    ///
    /// Production callers pass [`TELEGRAM_API_BASE`]; tests point this at a
    /// local mock server.
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create Telegram HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            token: token.into(),
        })
    }

    /// Send an HTML message to a chat, honoring Telegram rate limits.
    ///
    /// Link previews stay enabled. Returns once Telegram has accepted the
    /// message, or with a [`PublishError`] on any non-rate-limit failure.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), PublishError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);

        loop {
            let response = self
                .client
                .post(&url)
                .json(&json!({
                    "chat_id": chat_id,
                    "text": text,
                    "parse_mode": "HTML",
                    "disable_web_page_preview": false,
                }))
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                debug!("Message delivered to {}", chat_id);
                return Ok(());
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .json::<ApiResponse>()
                    .await
                    .ok()
                    .and_then(|r| r.parameters)
                    .and_then(|p| p.retry_after)
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_RETRY_AFTER);

                warn!(
                    "Telegram rate limit hit, pausing {}s before retrying",
                    retry_after.as_secs()
                );
                sleep(retry_after).await;
                continue;
            }

            let description = response
                .json::<ApiResponse>()
                .await
                .ok()
                .and_then(|r| r.description)
                .unwrap_or_else(|| "no error description".to_string());

            return Err(PublishError::Api {
                status,
                description,
            });
        }
    }
}
