//! Chat relay that maps slash commands onto issue tracker searches.
//!
//! The relay owns no transport: inbound messages arrive on a channel and
//! replies leave through a [`ChatSender`], so any chat platform adapter can be
//! wired in by the process entrypoint.

mod chat_command;
mod relay_runtime;
mod types;

pub use chat_command::{
    chat_command_usage, parse_chat_command, ChatCommand, PONG_REPLY, QUERY_USAGE,
    UNKNOWN_COMMAND_REPLY,
};
pub use relay_runtime::{ChatRelay, MessageOutcome, RelayConfig, RelayReport};
pub use types::{ChatSendError, ChatSender, InboundMessage, RelayError};
