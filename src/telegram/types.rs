use serde::{Deserialize, Serialize};
use std::fmt;

pub const PARSE_MODE_MARKDOWN_V2: &str = "MarkdownV2";

#[derive(Debug, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub chat_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_web_page_preview: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResult {
    pub message_id: i64,
    pub date: i64,
}

#[derive(Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_base_url: String,
    pub chat_id: String,
    pub disable_preview: bool,
}

impl TelegramConfig {
    pub fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token)
    }
}

// The token is part of every Bot API URL, keep it out of logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("chat_id", &self.chat_id)
            .field("disable_preview", &self.disable_preview)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TelegramConfig {
        TelegramConfig {
            bot_token: "123:secret".to_string(),
            api_base_url: "https://api.telegram.org".to_string(),
            chat_id: "-10042".to_string(),
            disable_preview: false,
        }
    }

    #[test]
    fn test_send_message_url() {
        assert_eq!(
            config().send_message_url(),
            "https://api.telegram.org/bot123:secret/sendMessage"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let printed = format!("{:?}", config());
        assert!(!printed.contains("secret"));
        assert!(printed.contains("-10042"));
    }

    #[test]
    fn test_message_skips_unset_options() {
        let message = TelegramMessage {
            chat_id: "-10042".to_string(),
            text: "hi".to_string(),
            parse_mode: Some(PARSE_MODE_MARKDOWN_V2.to_string()),
            disable_web_page_preview: None,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chat_id": "-10042",
                "text": "hi",
                "parse_mode": "MarkdownV2"
            })
        );
    }

    #[test]
    fn test_error_response_decodes() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities"}"#;
        let response: TelegramResponse<MessageResult> = serde_json::from_str(body).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(
            response.description.as_deref(),
            Some("Bad Request: can't parse entities")
        );
    }
}
