//! JQL builders for the fixed relay intents.

pub fn all_open_tasks_jql(project_key: &str) -> String {
    format!("project = {} AND status = Open", project_key.trim())
}

/// The seven-day window is evaluated by Jira itself (`startOfDay` is a server-side JQL function).
pub fn recent_open_tasks_jql(project_key: &str) -> String {
    format!(
        "{} AND created >= startOfDay(-7d)",
        all_open_tasks_jql(project_key)
    )
}
