use clap::Parser;
use sdbot_telegram::DEFAULT_TELEGRAM_API_BASE;

fn parse_non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("value must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "sdbot",
    about = "Telegram bot that relays Jira issue searches into chat",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long = "jira-url",
        env = "SDBOT_JIRA_URL",
        value_parser = parse_non_empty,
        help = "Jira site URL, for example https://acme.atlassian.net. The REST path /rest/api/2 is appended automatically."
    )]
    pub(crate) jira_url: String,

    #[arg(
        long = "jira-username",
        env = "SDBOT_JIRA_USERNAME",
        value_parser = parse_non_empty,
        help = "Jira account used for HTTP basic authentication."
    )]
    pub(crate) jira_username: String,

    #[arg(
        long = "jira-token",
        env = "SDBOT_JIRA_TOKEN",
        hide_env_values = true,
        value_parser = parse_non_empty,
        help = "Jira API token paired with --jira-username."
    )]
    pub(crate) jira_token: String,

    #[arg(
        long = "project-key",
        env = "SDBOT_PROJECT_KEY",
        value_parser = parse_non_empty,
        help = "Jira project key searched by /recent and /all."
    )]
    pub(crate) project_key: String,

    #[arg(
        long = "bot-api-key",
        env = "SDBOT_BOT_API_KEY",
        hide_env_values = true,
        value_parser = parse_non_empty,
        required_unless_present = "query",
        help = "Telegram bot token issued by BotFather."
    )]
    pub(crate) bot_api_key: Option<String>,

    #[arg(
        long = "telegram-api-base",
        env = "SDBOT_TELEGRAM_API_BASE",
        default_value = DEFAULT_TELEGRAM_API_BASE,
        help = "Telegram Bot API base URL."
    )]
    pub(crate) telegram_api_base: String,

    #[arg(
        long = "poll-timeout-secs",
        env = "SDBOT_POLL_TIMEOUT_SECS",
        default_value_t = 60,
        value_parser = parse_positive_u64,
        help = "Long-poll window for Telegram getUpdates."
    )]
    pub(crate) poll_timeout_secs: u64,

    #[arg(
        long = "poll-retry-delay-ms",
        env = "SDBOT_POLL_RETRY_DELAY_MS",
        default_value_t = 1_000,
        value_parser = parse_positive_u64,
        help = "Delay before polling Telegram again after a failed getUpdates call."
    )]
    pub(crate) poll_retry_delay_ms: u64,

    #[arg(
        long = "request-timeout-ms",
        env = "SDBOT_REQUEST_TIMEOUT_MS",
        default_value_t = 0,
        help = "HTTP request timeout for Jira and Telegram calls. 0 keeps the HTTP client default."
    )]
    pub(crate) request_timeout_ms: u64,

    #[arg(
        long = "query",
        value_name = "JQL",
        help = "Run a single JQL search, print the matching issues, and exit without starting the bot."
    )]
    pub(crate) query: Option<String>,
}
