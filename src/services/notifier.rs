use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("telegram returned HTTP {0}")]
    Status(StatusCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// The sink has no credentials; nothing left the process.
    Skipped,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError>;
}

pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(base_url: &str, token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            chat_id,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        let (Some(token), Some(chat_id)) = (&self.token, &self.chat_id) else {
            tracing::warn!("Telegram not configured (TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID), alert dropped");
            return Ok(Delivery::Skipped);
        };

        let url = format!("{}/bot{}/sendMessage", self.base_url, token);
        let resp = self.client
            .post(&url)
            .timeout(SEND_TIMEOUT)
            .form(&[("chat_id", chat_id.as_str()), ("text", text), ("parse_mode", "HTML")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(NotifyError::Status(resp.status()));
        }
        Ok(Delivery::Sent)
    }
}
