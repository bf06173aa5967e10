use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use httpmock::prelude::*;
use sdbot_relay::{
    ChatRelay, ChatSendError, ChatSender, InboundMessage, RelayConfig, RelayReport,
    UNKNOWN_COMMAND_REPLY,
};
use sdbot_telegram::{run_update_poller, TelegramApiClient, TelegramConfig};
use sdbot_tracker::{jira_api_base, jira_browse_base, JiraClient, JiraConfig};
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch, Mutex as AsyncMutex};

#[derive(Default)]
struct RecordingSender {
    sent: AsyncMutex<Vec<(i64, String)>>,
}

impl RecordingSender {
    async fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ChatSendError> {
        self.sent.lock().await.push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Delivers through the real Telegram client and reports each successful send.
struct NotifyingSender {
    inner: TelegramApiClient,
    delivered_tx: mpsc::UnboundedSender<i64>,
}

#[async_trait]
impl ChatSender for NotifyingSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), ChatSendError> {
        self.inner.send_text(chat_id, text).await?;
        let _ = self.delivered_tx.send(chat_id);
        Ok(())
    }
}

fn jira_client(site: &str) -> JiraClient {
    JiraClient::new(JiraConfig {
        api_base: jira_api_base(site),
        username: "alice".to_string(),
        token: "secret".to_string(),
        project_key: "P".to_string(),
        request_timeout_ms: 3_000,
    })
    .expect("jira client should build")
}

fn jira_issue(key: &str, summary: &str) -> Value {
    json!({
        "id": "10001",
        "key": key,
        "self": format!("https://jira.example/rest/api/2/issue/{key}"),
        "fields": {
            "summary": summary,
            "issuetype": {"name": "Task"},
            "status": {"name": "Open"},
            "assignee": {"displayName": "Alice"},
            "reporter": {"displayName": "Bob"},
            "created": "2024-01-01T00:00:00.000+0000",
            "updated": "2024-01-02T00:00:00.000+0000"
        }
    })
}

async fn run_to_completion(
    relay: &ChatRelay,
    messages: Vec<InboundMessage>,
) -> RelayReport {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    for message in messages {
        inbound_tx.send(message).expect("queue message");
    }
    drop(inbound_tx);
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    tokio::time::timeout(Duration::from_secs(10), relay.run(inbound_rx, cancel_rx))
        .await
        .expect("relay should drain the queue")
}

#[tokio::test]
async fn integration_recent_command_relays_each_jira_issue_as_its_own_reply() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/api/2/search")
            .query_param(
                "jql",
                "project = P AND status = Open AND created >= startOfDay(-7d)",
            )
            .header("authorization", "Basic YWxpY2U6c2VjcmV0");
        then.status(200).json_body(json!({
            "startAt": 0,
            "total": 2,
            "issues": [jira_issue("P-1", "first"), jira_issue("P-2", "second")]
        }));
    });

    let sender = Arc::new(RecordingSender::default());
    let relay = ChatRelay::new(
        Arc::new(jira_client(&server.base_url())),
        sender.clone(),
        RelayConfig {
            browse_base: jira_browse_base(&server.base_url()),
        },
    );

    let report = run_to_completion(&relay, vec![InboundMessage::text(77, "/recent")]).await;

    search.assert();
    let sent = sender.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(report.replies_sent, 2);
    assert!(sent.iter().all(|(chat_id, _)| *chat_id == 77));
    assert!(sent[0]
        .1
        .starts_with(&format!("{}/browse/P-1\n*first*", server.base_url())));
    assert!(sent[1]
        .1
        .starts_with(&format!("{}/browse/P-2\n*second*", server.base_url())));
    assert!(sent[0].1.contains("Assignee: Alice"));
}

#[tokio::test]
async fn integration_unreachable_jira_produces_error_reply_and_relay_keeps_serving() {
    let sender = Arc::new(RecordingSender::default());
    let relay = ChatRelay::new(
        Arc::new(jira_client("http://127.0.0.1:1")),
        sender.clone(),
        RelayConfig {
            browse_base: jira_browse_base("http://127.0.0.1:1"),
        },
    );

    let report = run_to_completion(
        &relay,
        vec![
            InboundMessage::text(5, "/all"),
            InboundMessage::text(5, "/ping"),
            InboundMessage::text(5, "garbage text"),
        ],
    )
    .await;

    let sent = sender.sent().await;
    assert_eq!(sent.len(), 3);
    assert!(sent[0].1.starts_with("Error: "));
    assert_eq!(sent[1].1, "pong");
    assert_eq!(sent[2].1, UNKNOWN_COMMAND_REPLY);
    assert_eq!(report.tracker_failures, 1);
    assert_eq!(report.messages_handled, 3);
}

#[tokio::test]
async fn integration_telegram_update_flows_through_relay_to_send_message() {
    let telegram = MockServer::start();
    let first_batch = telegram.mock(|when, then| {
        when.method(GET)
            .path("/botrelay-token/getUpdates")
            .query_param("offset", "0");
        then.status(200).json_body(json!({
            "ok": true,
            "result": [
                {"update_id": 500, "message": {"message_id": 1, "chat": {"id": 42}, "text": "/ping@sdbot"}}
            ]
        }));
    });
    let _idle_batch = telegram.mock(|when, then| {
        when.method(GET)
            .path("/botrelay-token/getUpdates")
            .query_param("offset", "501");
        then.status(200)
            .delay(Duration::from_millis(50))
            .json_body(json!({"ok": true, "result": []}));
    });
    let send = telegram.mock(|when, then| {
        when.method(POST)
            .path("/botrelay-token/sendMessage")
            .json_body(json!({"chat_id": 42, "text": "pong"}));
        then.status(200).json_body(json!({
            "ok": true,
            "result": {"message_id": 2, "chat": {"id": 42}, "text": "pong"}
        }));
    });

    let client = TelegramApiClient::new(TelegramConfig {
        api_base: telegram.base_url(),
        bot_token: "relay-token".to_string(),
        poll_timeout_secs: 0,
        request_timeout_ms: 3_000,
    })
    .expect("telegram client should build");
    let (delivered_tx, mut delivered_rx) = mpsc::unbounded_channel();
    let sender = Arc::new(NotifyingSender {
        inner: client.clone(),
        delivered_tx,
    });
    let relay = ChatRelay::new(
        Arc::new(jira_client("http://127.0.0.1:1")),
        sender,
        RelayConfig {
            browse_base: jira_browse_base("http://127.0.0.1:1"),
        },
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let poller = {
        let cancel_rx = cancel_rx.clone();
        tokio::spawn(async move {
            run_update_poller(&client, inbound_tx, cancel_rx, Duration::from_millis(10)).await
        })
    };
    let relay_task = tokio::spawn(async move { relay.run(inbound_rx, cancel_rx).await });

    let delivered = tokio::time::timeout(Duration::from_secs(10), delivered_rx.recv())
        .await
        .expect("reply should be delivered")
        .expect("sender should stay alive");
    assert_eq!(delivered, 42);

    cancel_tx.send(true).expect("signal cancellation");
    let relay_report = tokio::time::timeout(Duration::from_secs(5), relay_task)
        .await
        .expect("relay should stop")
        .expect("relay should not panic");
    let poller_report = tokio::time::timeout(Duration::from_secs(5), poller)
        .await
        .expect("poller should stop")
        .expect("poller should not panic");

    first_batch.assert_calls(1);
    send.assert();
    assert_eq!(relay_report.replies_sent, 1);
    assert_eq!(poller_report.forwarded_messages, 1);
}
