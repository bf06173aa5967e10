use crate::Issue;

pub fn render_issue_message(issue: &Issue, browse_base: &str) -> String {
    let fields = &issue.fields;
    [
        format!("{}/{}", browse_base.trim_end_matches('/'), issue.key),
        format!("*{}*", fields.summary),
        format!("Type: {}", fields.issue_type.name),
        format!("Status: {}", fields.status.name),
        format!("Assignee: {}", fields.assignee.display_name),
        format!("Reporter: {}", fields.reporter.display_name),
        format!("Created: {}", fields.created),
        format!("Updated: {}", fields.updated),
    ]
    .join("\n")
}

pub fn render_issue_digest(issues: &[Issue], browse_base: &str) -> String {
    if issues.is_empty() {
        return "No issues found.".to_string();
    }
    issues
        .iter()
        .map(|issue| render_issue_message(issue, browse_base))
        .collect::<Vec<_>>()
        .join("\n\n")
}
