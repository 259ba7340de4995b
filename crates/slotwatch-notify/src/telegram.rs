//! Telegram Bot API notification channel.

use crate::Notify;
use slotwatch_core::TelegramConfig;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org/bot";

/// Timeout for a single sendMessage call.
const API_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
enum SendError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error: {0}")]
    Api(String),
}

/// Posts alerts to a Telegram chat, optionally scoped to a forum topic.
pub struct TelegramNotifier {
    config: TelegramConfig,
    http: reqwest::Client,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_api_base(config, TELEGRAM_API_BASE)
    }

    /// Point the notifier at a different API base (tests).
    pub fn with_api_base(config: TelegramConfig, api_base: impl Into<String>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}{}/sendMessage", self.api_base, self.config.bot_key)
    }

    fn payload(&self, text: &str) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(thread_id) = self.config.thread_id {
            payload["message_thread_id"] = serde_json::Value::Number(thread_id.into());
        }
        payload
    }

    async fn send(&self, text: &str) -> Result<(), SendError> {
        let response = self
            .http
            .post(self.api_url())
            .json(&self.payload(text))
            .timeout(API_TIMEOUT)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SendError::Api(body))
        }
    }
}

#[async_trait::async_trait]
impl Notify for TelegramNotifier {
    async fn notify(&self, text: &str) {
        if !self.config.enabled {
            debug!("telegram disabled, dropping message");
            return;
        }

        match self.send(text).await {
            Ok(()) => info!("telegram message sent"),
            Err(e) => error!("telegram send failed: {}", e),
        }
    }
}
