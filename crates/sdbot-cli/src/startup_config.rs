use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;
use sdbot_telegram::TelegramConfig;
use sdbot_tracker::{jira_api_base, jira_browse_base, JiraConfig};

use crate::cli_args::Cli;

#[derive(Debug, Clone)]
pub(crate) enum StartupMode {
    /// Long-poll Telegram and relay commands until a shutdown signal arrives.
    Bot {
        telegram: TelegramConfig,
        poll_retry_delay: Duration,
    },
    /// Run one JQL search, print the results, and exit.
    Query { jql: String },
}

#[derive(Debug, Clone)]
pub(crate) struct StartupConfig {
    pub(crate) jira: JiraConfig,
    pub(crate) browse_base: String,
    pub(crate) mode: StartupMode,
}

impl StartupConfig {
    pub(crate) fn from_cli(cli: &Cli) -> Result<Self> {
        validate_http_url("jira url", &cli.jira_url)?;

        let jira = JiraConfig {
            api_base: jira_api_base(&cli.jira_url),
            username: cli.jira_username.clone(),
            token: cli.jira_token.clone(),
            project_key: cli.project_key.clone(),
            request_timeout_ms: cli.request_timeout_ms,
        };
        let browse_base = jira_browse_base(&cli.jira_url);

        let mode = match cli.query.as_deref().map(str::trim) {
            Some("") => bail!("--query requires a non-empty JQL expression"),
            Some(jql) => StartupMode::Query {
                jql: jql.to_string(),
            },
            None => {
                let bot_token = cli
                    .bot_api_key
                    .clone()
                    .context("SDBOT_BOT_API_KEY is required to start the bot")?;
                validate_http_url("telegram api base", &cli.telegram_api_base)?;
                StartupMode::Bot {
                    telegram: TelegramConfig {
                        api_base: cli.telegram_api_base.trim().to_string(),
                        bot_token,
                        poll_timeout_secs: cli.poll_timeout_secs,
                        request_timeout_ms: cli.request_timeout_ms,
                    },
                    poll_retry_delay: Duration::from_millis(cli.poll_retry_delay_ms),
                }
            }
        };

        Ok(Self {
            jira,
            browse_base,
            mode,
        })
    }
}

fn validate_http_url(label: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid {label} '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("invalid {label} '{raw}': scheme must be http or https");
    }
    if url.host_str().is_none() {
        bail!("invalid {label} '{raw}': missing host");
    }
    Ok(())
}
