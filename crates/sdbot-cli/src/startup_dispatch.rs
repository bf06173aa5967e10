use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use sdbot_relay::{ChatRelay, RelayConfig};
use sdbot_telegram::{run_update_poller, TelegramApiClient, TelegramConfig};
use sdbot_tracker::{render_issue_digest, IssueTracker, JiraClient};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::startup_config::{StartupConfig, StartupMode};

pub(crate) async fn run_startup(config: StartupConfig) -> Result<()> {
    let jira = JiraClient::new(config.jira.clone()).context("failed to create jira client")?;
    info!(
        api_base = %config.jira.api_base,
        project = jira.project_key(),
        "jira client configured"
    );

    match config.mode {
        StartupMode::Query { jql } => run_one_shot_query(&jira, &jql, &config.browse_base).await,
        StartupMode::Bot {
            telegram,
            poll_retry_delay,
        } => run_bot(jira, telegram, config.browse_base, poll_retry_delay).await,
    }
}

async fn run_one_shot_query(jira: &JiraClient, jql: &str, browse_base: &str) -> Result<()> {
    let issues = jira
        .query(jql)
        .await
        .with_context(|| format!("jira search failed for '{jql}'"))?;
    info!(count = issues.len(), "jira search completed");
    println!("{}", render_issue_digest(&issues, browse_base));
    Ok(())
}

async fn run_bot(
    jira: JiraClient,
    telegram: TelegramConfig,
    browse_base: String,
    poll_retry_delay: Duration,
) -> Result<()> {
    let telegram =
        Arc::new(TelegramApiClient::new(telegram).context("failed to create telegram client")?);
    let bot = telegram
        .get_me()
        .await
        .context("telegram rejected the bot token")?;
    info!(
        bot_id = bot.id,
        username = bot.username.as_deref().unwrap_or(bot.first_name.as_str()),
        "telegram bot authenticated"
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    let signal_task = tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("shutdown signal received");
        let _ = cancel_tx.send(true);
    });

    let poller_task = {
        let telegram = Arc::clone(&telegram);
        let cancel_rx = cancel_rx.clone();
        tokio::spawn(async move {
            run_update_poller(&telegram, inbound_tx, cancel_rx, poll_retry_delay).await
        })
    };

    let relay = ChatRelay::new(Arc::new(jira), telegram, RelayConfig { browse_base });
    let relay_report = relay.run(inbound_rx, cancel_rx).await;

    let poller_report = poller_task.await.context("telegram poller task failed")?;
    signal_task.abort();

    info!(
        handled = relay_report.messages_handled,
        ignored = relay_report.messages_ignored,
        replies = relay_report.replies_sent,
        tracker_failures = relay_report.tracker_failures,
        send_failures = relay_report.send_failures,
        forwarded = poller_report.forwarded_messages,
        poll_failures = poller_report.poll_failures,
        "sdbot stopped"
    );
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        if let Err(error) = result {
                            warn!(%error, "failed to listen for ctrl-c");
                            terminate.recv().await;
                        }
                    }
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(error) => warn!(%error, "failed to install SIGTERM handler"),
        }
    }

    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c; shutdown signals are disabled");
        std::future::pending::<()>().await;
    }
}
