//! Telegram Bot API client helpers used by update polling and reply delivery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use sdbot_relay::{ChatSendError, ChatSender};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::types::{TelegramConfig, TelegramEnvelope, TelegramError, TelegramUpdate, TelegramUser};

pub const TELEGRAM_MAX_MESSAGE_CHARS: usize = 4096;
const POLL_REQUEST_GRACE_SECS: u64 = 10;
const ERROR_BODY_MAX_CHARS: usize = 320;

/// Telegram measures message length in UTF-16 code units, so the cap is applied
/// in those units; the result never splits a character.
pub fn truncate_for_telegram(value: &str, max_units: usize) -> String {
    if value.encode_utf16().count() <= max_units {
        return value.to_string();
    }
    let budget = max_units.saturating_sub(3);
    let mut used = 0_usize;
    let mut truncated = String::new();
    for ch in value.chars() {
        let width = ch.len_utf16();
        if used.saturating_add(width) > budget {
            break;
        }
        used += width;
        truncated.push(ch);
    }
    truncated.push_str("...");
    truncated
}

#[derive(Debug, Clone)]
pub struct TelegramApiClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    poll_timeout_secs: u64,
}

impl TelegramApiClient {
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let bot_token = config.bot_token.trim().to_string();
        if bot_token.is_empty() {
            return Err(TelegramError::MissingToken);
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("sdbot-telegram"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut builder = reqwest::Client::builder().default_headers(headers);
        if config.request_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.request_timeout_ms));
        }
        let http = builder.build().map_err(|source| TelegramError::Http {
            method: "client",
            source,
        })?;

        Ok(Self {
            http,
            api_base: config.api_base.trim().trim_end_matches('/').to_string(),
            bot_token,
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    /// Returns the bot account; fails when the token is rejected.
    pub async fn get_me(&self) -> Result<TelegramUser, TelegramError> {
        let request = self.http.get(self.method_url("getMe"));
        self.call("getMe", request).await
    }

    pub async fn get_updates(&self, offset: u64) -> Result<Vec<TelegramUpdate>, TelegramError> {
        let request = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.poll_timeout_secs.to_string()),
            ])
            .timeout(Duration::from_secs(
                self.poll_timeout_secs.saturating_add(POLL_REQUEST_GRACE_SECS),
            ));
        self.call("getUpdates", request).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let payload = json!({
            "chat_id": chat_id,
            "text": truncate_for_telegram(text, TELEGRAM_MAX_MESSAGE_CHARS),
        });
        let request = self.http.post(self.method_url("sendMessage")).json(&payload);
        let _message: Value = self.call("sendMessage", request).await?;
        debug!(chat_id, "telegram message sent");
        Ok(())
    }

    async fn call<T>(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TelegramError>
    where
        T: DeserializeOwned,
    {
        // Request URLs embed the bot token, so they are stripped from transport errors.
        let response = request
            .send()
            .await
            .map_err(|source| TelegramError::Http {
                method,
                source: source.without_url(),
            })?;
        let status = response.status();
        let raw = response.text().await.map_err(|source| TelegramError::Http {
            method,
            source: source.without_url(),
        })?;
        let envelope = serde_json::from_str::<TelegramEnvelope<T>>(&raw);

        if !status.is_success() {
            let description = envelope
                .ok()
                .and_then(|envelope| envelope.description)
                .unwrap_or_else(|| truncate_for_telegram(raw.trim(), ERROR_BODY_MAX_CHARS));
            return Err(TelegramError::HttpStatus {
                method,
                status: status.as_u16(),
                description,
            });
        }

        let envelope = envelope.map_err(|source| TelegramError::Decode { method, source })?;
        if !envelope.ok {
            return Err(TelegramError::Api {
                method,
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        envelope
            .result
            .ok_or(TelegramError::MissingResult { method })
    }
}

#[async_trait]
impl ChatSender for TelegramApiClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ChatSendError> {
        self.send_message(chat_id, text)
            .await
            .map_err(|error| ChatSendError {
                chat_id,
                reason: error.to_string(),
            })
    }
}
