use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use tracing::debug;

use crate::{
    jql::{all_open_tasks_jql, recent_open_tasks_jql},
    Issue, IssueTracker, TrackerError,
};

const JIRA_REST_API_SUFFIX: &str = "/rest/api/2";
const ERROR_BODY_MAX_CHARS: usize = 800;

/// Derives the REST v2 base (`<site>/rest/api/2`) from a Jira site URL.
pub fn jira_api_base(site_url: &str) -> String {
    let site = site_url.trim().trim_end_matches('/');
    if site.ends_with(JIRA_REST_API_SUFFIX) {
        return site.to_string();
    }
    format!("{site}{JIRA_REST_API_SUFFIX}")
}

/// Derives the human-facing browse base (`<site>/browse`) from a Jira site URL.
pub fn jira_browse_base(site_url: &str) -> String {
    let site = site_url.trim().trim_end_matches('/');
    let site = site.strip_suffix(JIRA_REST_API_SUFFIX).unwrap_or(site);
    format!("{site}/browse")
}

fn truncate_for_error(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect::<String>();
    truncated.push_str("...");
    truncated
}

#[derive(Debug, Clone)]
/// Connection settings for one Jira project.
pub struct JiraConfig {
    pub api_base: String,
    pub username: String,
    pub token: String,
    pub project_key: String,
    /// Zero leaves the HTTP client's default timeout behavior in place.
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    issues: Vec<Issue>,
}

#[derive(Debug, Clone)]
/// Jira search client bound to a single project key.
pub struct JiraClient {
    client: reqwest::Client,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self, TrackerError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if config.request_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.request_timeout_ms));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn project_key(&self) -> &str {
        self.config.project_key.as_str()
    }

    fn search_url(&self) -> Result<reqwest::Url, TrackerError> {
        let raw = format!(
            "{}/search",
            self.config.api_base.trim().trim_end_matches('/')
        );
        reqwest::Url::parse(&raw).map_err(|error| TrackerError::InvalidUrl {
            url: raw.clone(),
            reason: error.to_string(),
        })
    }

    async fn search(&self, jql: &str) -> Result<Vec<Issue>, TrackerError> {
        let url = self.search_url()?;
        debug!(jql, url = %url, "querying jira search api");

        let response = self
            .client
            .get(url)
            .query(&[("jql", jql)])
            .basic_auth(&self.config.username, Some(&self.config.token))
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(TrackerError::HttpStatus {
                status: status.as_u16(),
                body: truncate_for_error(raw.trim(), ERROR_BODY_MAX_CHARS),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&raw)?;
        debug!(count = parsed.issues.len(), "jira search completed");
        Ok(parsed.issues)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn recent_open_tasks(&self) -> Result<Vec<Issue>, TrackerError> {
        self.search(&recent_open_tasks_jql(self.project_key())).await
    }

    async fn all_open_tasks(&self) -> Result<Vec<Issue>, TrackerError> {
        self.search(&all_open_tasks_jql(self.project_key())).await
    }

    async fn query(&self, jql: &str) -> Result<Vec<Issue>, TrackerError> {
        self.search(jql).await
    }
}
