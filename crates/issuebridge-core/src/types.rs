//! Unified types exchanged across the tracker boundary.

use serde::{Deserialize, Serialize};

/// Input for creating an issue.
///
/// `assignee` and `reporter` may be account identifiers or free-text
/// names; free text is resolved through a user search by the adapter.
#[derive(Debug, Clone, Default)]
pub struct CreateIssueInput {
    pub project_key: String,
    pub summary: String,
    pub issue_type: String,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub priority: Option<String>,
    pub parent: Option<String>,
}

/// A newly created issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// Issue key, e.g. "PROJ-42"
    pub key: String,
    /// Browsable URL for the issue
    pub url: String,
}

/// A user known to the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerUser {
    /// The tracker's internal account identifier
    pub account_id: String,
    /// Human-readable display name
    pub display_name: Option<String>,
}

/// Query for listing issues of a project.
#[derive(Debug, Clone)]
pub struct IssueQuery {
    pub project_key: String,
    /// Extra filter clause, appended verbatim to the project restriction
    pub jql: Option<String>,
}

/// One issue in a listing result.
///
/// Fields absent on the source issue are `None` and omitted from the
/// serialized output rather than causing failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_summary_omits_absent_fields() {
        let issue = IssueSummary {
            key: "PROJ-1".to_string(),
            summary: Some("Fix login".to_string()),
            status: None,
            priority: None,
            assignee: None,
            issue_type: None,
            url: "https://team.atlassian.net/browse/PROJ-1".to_string(),
        };

        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"key\":\"PROJ-1\""));
        assert!(json.contains("\"summary\":\"Fix login\""));
        assert!(!json.contains("status"));
        assert!(!json.contains("priority"));
        assert!(!json.contains("assignee"));
        assert!(!json.contains("issueType"));
    }

    #[test]
    fn test_issue_summary_camel_case() {
        let issue = IssueSummary {
            key: "PROJ-2".to_string(),
            summary: None,
            status: Some("Open".to_string()),
            priority: Some("High".to_string()),
            assignee: Some("John Doe".to_string()),
            issue_type: Some("Bug".to_string()),
            url: "https://team.atlassian.net/browse/PROJ-2".to_string(),
        };

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["issueType"], "Bug");
        assert_eq!(json["assignee"], "John Doe");
    }
}
