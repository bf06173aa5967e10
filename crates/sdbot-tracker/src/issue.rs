//! Read-only projection of a Jira issue as returned by the REST v2 search API.

use serde::{Deserialize, Deserializer};

/// Jira sends `null` for unset references (an unassigned issue has `"assignee": null`).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
/// One tracked work item.
pub struct Issue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(rename = "self", default, deserialize_with = "null_as_default")]
    pub self_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: Project,
    #[serde(rename = "issuetype", default, deserialize_with = "null_as_default")]
    pub issue_type: IssueType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignee: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reporter: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "self", default, deserialize_with = "null_as_default")]
    pub self_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueType {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "self", default, deserialize_with = "null_as_default")]
    pub self_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "displayName", default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(rename = "emailAddress", default, deserialize_with = "null_as_default")]
    pub email_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Status {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "self", default, deserialize_with = "null_as_default")]
    pub self_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Priority {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "self", default, deserialize_with = "null_as_default")]
    pub self_link: String,
}

#[cfg(test)]
mod tests {
    use super::Issue;
    use serde_json::json;

    #[test]
    fn unit_issue_decodes_jira_v2_field_names() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "10001",
            "key": "ABC-7",
            "self": "https://jira.example/rest/api/2/issue/10001",
            "fields": {
                "summary": "Broken login",
                "description": "Users cannot log in",
                "project": {"id": "1", "key": "ABC", "name": "Alpha", "self": "p-self"},
                "issuetype": {"id": "3", "name": "Task", "self": "t-self"},
                "assignee": {"name": "alice", "displayName": "Alice A", "emailAddress": "alice@example.com"},
                "reporter": {"name": "bob", "displayName": "Bob B", "emailAddress": "bob@example.com"},
                "created": "2024-01-02T03:04:05.000+0000",
                "updated": "2024-01-03T03:04:05.000+0000",
                "status": {"id": "1", "name": "Open", "self": "s-self"},
                "priority": {"id": "2", "name": "High", "self": "pr-self"}
            }
        }))
        .expect("issue should decode");

        assert_eq!(issue.key, "ABC-7");
        assert_eq!(issue.self_link, "https://jira.example/rest/api/2/issue/10001");
        assert_eq!(issue.fields.project.key, "ABC");
        assert_eq!(issue.fields.issue_type.name, "Task");
        assert_eq!(issue.fields.assignee.display_name, "Alice A");
        assert_eq!(issue.fields.reporter.email_address, "bob@example.com");
        assert_eq!(issue.fields.status.name, "Open");
        assert_eq!(issue.fields.priority.name, "High");
    }

    #[test]
    fn regression_issue_decodes_null_and_missing_references_as_empty() {
        let issue: Issue = serde_json::from_value(json!({
            "key": "ABC-8",
            "fields": {
                "summary": "Unassigned",
                "description": null,
                "assignee": null
            }
        }))
        .expect("sparse issue should decode");

        assert_eq!(issue.id, "");
        assert_eq!(issue.fields.description, "");
        assert_eq!(issue.fields.assignee.display_name, "");
        assert_eq!(issue.fields.reporter.display_name, "");
        assert_eq!(issue.fields.status.name, "");
    }
}
