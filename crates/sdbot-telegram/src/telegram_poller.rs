//! Long-poll loop that feeds Telegram messages into the relay's inbound channel.

use std::time::Duration;

use sdbot_relay::InboundMessage;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::TelegramApiClient;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollerReport {
    pub forwarded_messages: usize,
    pub skipped_updates: usize,
    pub poll_failures: usize,
}

/// Polls `getUpdates` until cancellation or until the relay drops its receiver.
///
/// The offset advances past every update received, including the ones that are
/// skipped, so Telegram does not redeliver them.
pub async fn run_update_poller(
    client: &TelegramApiClient,
    inbound_tx: mpsc::UnboundedSender<InboundMessage>,
    mut cancel_rx: watch::Receiver<bool>,
    retry_delay: Duration,
) -> PollerReport {
    let mut report = PollerReport::default();
    let mut offset = 0_u64;
    info!("telegram update poller started");

    loop {
        if *cancel_rx.borrow() {
            break;
        }

        let polled = tokio::select! {
            biased;
            changed = cancel_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = inbound_tx.closed() => {
                info!("relay inbound channel closed; stopping poller");
                break;
            }
            polled = client.get_updates(offset) => polled,
        };

        let updates = match polled {
            Ok(updates) => updates,
            Err(error) => {
                report.poll_failures = report.poll_failures.saturating_add(1);
                warn!(%error, "telegram getUpdates failed");
                tokio::select! {
                    _ = cancel_rx.changed() => {}
                    _ = tokio::time::sleep(retry_delay) => {}
                }
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id.saturating_add(1));
            let Some(message) = update.message else {
                report.skipped_updates = report.skipped_updates.saturating_add(1);
                debug!(update_id = update.update_id, "skipping non-message update");
                continue;
            };
            let inbound = InboundMessage {
                chat_id: message.chat.id,
                text: message.text,
            };
            if inbound_tx.send(inbound).is_err() {
                info!("relay inbound channel closed; stopping poller");
                return report;
            }
            report.forwarded_messages = report.forwarded_messages.saturating_add(1);
        }
    }

    info!(
        forwarded = report.forwarded_messages,
        skipped = report.skipped_updates,
        failures = report.poll_failures,
        "telegram update poller stopped"
    );
    report
}
