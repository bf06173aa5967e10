use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_base: String,
    pub bot_token: String,
    /// Long-poll window passed to `getUpdates`.
    pub poll_timeout_secs: u64,
    /// Zero leaves the HTTP client's default timeout behavior in place.
    pub request_timeout_ms: u64,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            bot_token: bot_token.into(),
            poll_timeout_secs: 60,
            request_timeout_ms: 0,
        }
    }
}

#[derive(Debug, Error)]
/// Enumerates Telegram Bot API failures.
pub enum TelegramError {
    #[error("missing telegram bot token")]
    MissingToken,
    #[error("telegram {method} request failed: {source}")]
    Http {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("telegram {method} returned status {status}: {description}")]
    HttpStatus {
        method: &'static str,
        status: u16,
        description: String,
    },
    #[error("telegram {method} rejected the request: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
    #[error("failed to decode telegram {method} response: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("telegram {method} response is missing result")]
    MissingResult { method: &'static str },
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct TelegramEnvelope<T> {
    pub(crate) ok: bool,
    #[serde(default)]
    pub(crate) result: Option<T>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Only `message` updates are relayed; other kinds decode with `message: None`.
pub struct TelegramUpdate {
    pub update_id: u64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}
