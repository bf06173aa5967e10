//! Telegram Bot API transport for the sdbot chat relay.
//!
//! Provides long-poll ingestion of updates into the relay's inbound channel and
//! a [`sdbot_relay::ChatSender`] implementation backed by `sendMessage`.

mod telegram_api_client;
mod telegram_poller;
mod types;

pub use telegram_api_client::{
    truncate_for_telegram, TelegramApiClient, TELEGRAM_MAX_MESSAGE_CHARS,
};
pub use telegram_poller::{run_update_poller, PollerReport};
pub use types::{
    TelegramChat, TelegramConfig, TelegramError, TelegramMessage, TelegramUpdate, TelegramUser,
    DEFAULT_TELEGRAM_API_BASE,
};
