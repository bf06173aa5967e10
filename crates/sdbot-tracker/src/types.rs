use async_trait::async_trait;
use thiserror::Error;

use crate::Issue;

#[derive(Debug, Error)]
/// Enumerates tracker query failures.
pub enum TrackerError {
    #[error("invalid tracker url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("tracker returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("failed to decode tracker response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
/// Search operations the relay needs from an issue tracker.
pub trait IssueTracker: Send + Sync {
    /// Open issues in the configured project created within the last seven days.
    async fn recent_open_tasks(&self) -> Result<Vec<Issue>, TrackerError>;

    /// All open issues in the configured project.
    async fn all_open_tasks(&self) -> Result<Vec<Issue>, TrackerError>;

    /// Issues matching a caller-supplied JQL string, sent verbatim.
    async fn query(&self, jql: &str) -> Result<Vec<Issue>, TrackerError>;
}
