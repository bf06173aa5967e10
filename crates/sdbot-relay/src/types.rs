use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One inbound chat message as seen by the relay.
pub struct InboundMessage {
    pub chat_id: i64,
    pub text: Option<String>,
}

impl InboundMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: Some(text.into()),
        }
    }

    pub fn without_text(chat_id: i64) -> Self {
        Self {
            chat_id,
            text: None,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("failed to deliver message to chat {chat_id}: {reason}")]
pub struct ChatSendError {
    pub chat_id: i64,
    pub reason: String,
}

#[derive(Debug, Error)]
/// Enumerates failures that end processing of the current command.
pub enum RelayError {
    #[error("command {command} stopped after {replies_sent} replies: {source}")]
    Send {
        command: &'static str,
        replies_sent: usize,
        #[source]
        source: ChatSendError,
    },
}

#[async_trait]
/// Outbound half of a chat transport.
pub trait ChatSender: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ChatSendError>;
}
