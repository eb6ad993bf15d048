use super::types::{
    MessageResult, TelegramConfig, TelegramMessage, TelegramResponse, PARSE_MODE_MARKDOWN_V2,
};
use super::Notifier;
use crate::errors::{ConfigError, DeliveryError};
use crate::http;
use reqwest::Client;

pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self, ConfigError> {
        let client = http::build_client()?;

        Ok(Self { client, config })
    }

    pub fn chat_id(&self) -> &str {
        &self.config.chat_id
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<MessageResult, DeliveryError> {
        let message = TelegramMessage {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode: parse_mode.map(|s| s.to_string()),
            disable_web_page_preview: self.config.disable_preview.then_some(true),
        };

        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(DeliveryError::Api(describe_failure(status.as_u16(), &error_text)));
        }

        let telegram_response: TelegramResponse<MessageResult> = response.json().await?;

        if !telegram_response.ok {
            let error_msg = telegram_response
                .description
                .unwrap_or_else(|| "Unknown Telegram API error".to_string());
            return Err(DeliveryError::Api(error_msg));
        }

        telegram_response
            .result
            .ok_or_else(|| DeliveryError::Api("No result in Telegram response".to_string()))
    }

    pub async fn send_markdown_message(
        &self,
        chat_id: &str,
        markdown_text: &str,
    ) -> Result<MessageResult, DeliveryError> {
        self.send_message(chat_id, markdown_text, Some(PARSE_MODE_MARKDOWN_V2))
            .await
    }
}

impl Notifier for TelegramClient {
    async fn notify(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        let result = self.send_markdown_message(chat_id, text).await?;
        log::debug!("Telegram accepted message_id={}", result.message_id);
        Ok(())
    }
}

/// Telegram error bodies are JSON with a `description`; fall back to the raw
/// body when they are not.
fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<TelegramResponse<serde_json::Value>>(body) {
        Ok(TelegramResponse {
            description: Some(description),
            ..
        }) => format!("{status}: {description}"),
        _ => format!("{status}: {body}"),
    }
}
