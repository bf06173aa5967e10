//! Relay loop that answers chat commands with tracker search results.

use std::sync::Arc;

use sdbot_tracker::{render_issue_message, Issue, IssueTracker, TrackerError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::{
    chat_command::{chat_command_usage, parse_chat_command, PONG_REPLY, UNKNOWN_COMMAND_REPLY},
    ChatCommand, ChatSender, InboundMessage, RelayError,
};

#[derive(Debug, Clone)]
/// Runtime configuration for the relay loop.
pub struct RelayConfig {
    /// Prefix for issue links, e.g. `https://acme.atlassian.net/browse`.
    pub browse_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Ignored,
    Replied {
        command: &'static str,
        replies: usize,
    },
    TrackerFailed {
        command: &'static str,
        error: String,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayReport {
    pub messages_handled: usize,
    pub messages_ignored: usize,
    pub replies_sent: usize,
    pub tracker_failures: usize,
    pub send_failures: usize,
}

pub struct ChatRelay {
    tracker: Arc<dyn IssueTracker>,
    sender: Arc<dyn ChatSender>,
    config: RelayConfig,
}

impl ChatRelay {
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        sender: Arc<dyn ChatSender>,
        config: RelayConfig,
    ) -> Self {
        Self {
            tracker,
            sender,
            config,
        }
    }

    /// Processes inbound messages one at a time until cancellation is signalled
    /// or the inbound channel closes.
    ///
    /// Cancellation is only observed between messages; a command that already
    /// started runs to completion.
    pub async fn run(
        &self,
        mut inbound: mpsc::UnboundedReceiver<InboundMessage>,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> RelayReport {
        let mut report = RelayReport::default();
        info!("chat relay started");
        loop {
            if *cancel_rx.borrow() {
                info!("chat relay shutdown requested");
                break;
            }
            tokio::select! {
                biased;
                changed = cancel_rx.changed() => {
                    if changed.is_err() {
                        info!("chat relay cancellation handle dropped");
                        break;
                    }
                }
                maybe_message = inbound.recv() => {
                    let Some(message) = maybe_message else {
                        info!("chat relay inbound stream closed");
                        break;
                    };
                    self.process_message(&message, &mut report).await;
                }
            }
        }
        info!(
            handled = report.messages_handled,
            ignored = report.messages_ignored,
            replies = report.replies_sent,
            tracker_failures = report.tracker_failures,
            send_failures = report.send_failures,
            "chat relay stopped"
        );
        report
    }

    async fn process_message(&self, message: &InboundMessage, report: &mut RelayReport) {
        match self.handle_message(message).await {
            Ok(MessageOutcome::Ignored) => {
                report.messages_ignored = report.messages_ignored.saturating_add(1);
            }
            Ok(MessageOutcome::Replied { command, replies }) => {
                report.messages_handled = report.messages_handled.saturating_add(1);
                report.replies_sent = report.replies_sent.saturating_add(replies);
                debug!(chat_id = message.chat_id, command, replies, "command answered");
            }
            Ok(MessageOutcome::TrackerFailed { command, error }) => {
                report.messages_handled = report.messages_handled.saturating_add(1);
                report.replies_sent = report.replies_sent.saturating_add(1);
                report.tracker_failures = report.tracker_failures.saturating_add(1);
                warn!(chat_id = message.chat_id, command, %error, "tracker query failed");
            }
            Err(RelayError::Send {
                command,
                replies_sent,
                source,
            }) => {
                report.messages_handled = report.messages_handled.saturating_add(1);
                report.replies_sent = report.replies_sent.saturating_add(replies_sent);
                report.send_failures = report.send_failures.saturating_add(1);
                warn!(
                    chat_id = message.chat_id,
                    command,
                    replies_sent,
                    error = %source,
                    "reply delivery failed; abandoning command"
                );
            }
        }
    }

    /// Answers a single inbound message.
    pub async fn handle_message(
        &self,
        message: &InboundMessage,
    ) -> Result<MessageOutcome, RelayError> {
        let Some(command) = message.text.as_deref().and_then(parse_chat_command) else {
            return Ok(MessageOutcome::Ignored);
        };
        let label = command.label();
        let chat_id = message.chat_id;

        match command {
            ChatCommand::Start => {
                self.send(chat_id, label, &chat_command_usage(), 0).await?;
                Ok(MessageOutcome::Replied {
                    command: label,
                    replies: 1,
                })
            }
            ChatCommand::Ping => {
                self.send(chat_id, label, PONG_REPLY, 0).await?;
                Ok(MessageOutcome::Replied {
                    command: label,
                    replies: 1,
                })
            }
            ChatCommand::Recent => {
                let result = self.tracker.recent_open_tasks().await;
                self.relay_issues(chat_id, label, result).await
            }
            ChatCommand::All => {
                let result = self.tracker.all_open_tasks().await;
                self.relay_issues(chat_id, label, result).await
            }
            ChatCommand::Query { jql } => {
                let result = self.tracker.query(&jql).await;
                self.relay_issues(chat_id, label, result).await
            }
            ChatCommand::Invalid { message } => {
                self.send(chat_id, label, &message, 0).await?;
                Ok(MessageOutcome::Replied {
                    command: label,
                    replies: 1,
                })
            }
            ChatCommand::Unknown => {
                self.send(chat_id, label, UNKNOWN_COMMAND_REPLY, 0).await?;
                Ok(MessageOutcome::Replied {
                    command: label,
                    replies: 1,
                })
            }
        }
    }

    async fn relay_issues(
        &self,
        chat_id: i64,
        command: &'static str,
        result: Result<Vec<Issue>, TrackerError>,
    ) -> Result<MessageOutcome, RelayError> {
        let issues = match result {
            Ok(issues) => issues,
            Err(error) => {
                self.send(chat_id, command, &format!("Error: {error}"), 0)
                    .await?;
                return Ok(MessageOutcome::TrackerFailed {
                    command,
                    error: error.to_string(),
                });
            }
        };

        for (index, issue) in issues.iter().enumerate() {
            let rendered = render_issue_message(issue, &self.config.browse_base);
            self.send(chat_id, command, &rendered, index).await?;
        }
        Ok(MessageOutcome::Replied {
            command,
            replies: issues.len(),
        })
    }

    async fn send(
        &self,
        chat_id: i64,
        command: &'static str,
        text: &str,
        replies_sent: usize,
    ) -> Result<(), RelayError> {
        self.sender
            .send_text(chat_id, text)
            .await
            .map_err(|source| RelayError::Send {
                command,
                replies_sent,
                source,
            })
    }
}
