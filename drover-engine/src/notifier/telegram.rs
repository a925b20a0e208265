//! Telegram notification sink

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::Notifier;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Sends notifications to a Telegram chat through the Bot API
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    base_url: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            base_url: TELEGRAM_API.to_string(),
            client,
        }
    }

    /// Points the notifier at another Bot API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .context("Failed to reach Telegram")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram returned {}: {}", status, body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::new("123:abc", "42");
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );

        let notifier = notifier.with_base_url("http://localhost:9000/");
        assert_eq!(
            notifier.send_message_url(),
            "http://localhost:9000/bot123:abc/sendMessage"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let notifier = TelegramNotifier::new("t", "c").with_base_url("http://127.0.0.1:9");
        assert!(notifier.notify("hi").await.is_err());
    }
}
