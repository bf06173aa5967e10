//! Jira issue model, rendering, and search client used by the sdbot relay.
mod issue;
mod issue_render;
mod jira_client;
mod jql;
mod types;

pub use issue::{Issue, IssueFields, IssueType, Priority, Project, Status, User};
pub use issue_render::{render_issue_digest, render_issue_message};
pub use jira_client::{jira_api_base, jira_browse_base, JiraClient, JiraConfig};
pub use jql::{all_open_tasks_jql, recent_open_tasks_jql};
pub use types::{IssueTracker, TrackerError};
