//! Jira API request and response types.
//!
//! These represent the raw JSON shapes of the Jira REST API. They are
//! mapped to the unified `issuebridge-core` types at the client boundary.

use serde::{Deserialize, Serialize};

// =============================================================================
// User
// =============================================================================

/// Jira user representation.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraUser {
    /// Account ID
    #[serde(default, rename = "accountId")]
    pub account_id: Option<String>,
    /// Display name
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
    /// Email address
    #[serde(default, rename = "emailAddress")]
    pub email_address: Option<String>,
}

// =============================================================================
// Issue
// =============================================================================

/// Jira issue representation.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    /// Issue key (e.g., "PROJ-123")
    pub key: String,
    /// Issue fields
    pub fields: JiraIssueFields,
}

/// Jira issue fields, limited to the set the bridge requests.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueFields {
    /// Summary (title)
    #[serde(default)]
    pub summary: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    /// Status
    #[serde(default)]
    pub status: Option<JiraStatus>,
    /// Priority
    #[serde(default)]
    pub priority: Option<JiraPriority>,
    /// Assignee
    #[serde(default)]
    pub assignee: Option<JiraUser>,
    /// Issue type
    #[serde(default)]
    pub issuetype: Option<JiraIssueType>,
    /// Parent issue, when the issue is a subtask
    #[serde(default)]
    pub parent: Option<JiraIssueRef>,
    /// Subtasks
    #[serde(default)]
    pub subtasks: Vec<JiraIssueRef>,
}

/// Jira issue status.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraStatus {
    /// Status name
    pub name: String,
}

/// Jira issue priority.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraPriority {
    /// Priority name
    pub name: String,
}

/// Jira issue type.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueType {
    /// Issue type name (e.g., "Task", "Bug")
    pub name: String,
}

/// Minimal reference to another issue (parent/subtask links).
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueRef {
    /// Issue key
    pub key: String,
}

/// Response from GET /search.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraSearchResponse {
    /// Issues
    pub issues: Vec<JiraIssue>,
}

// =============================================================================
// Create types
// =============================================================================

/// Request body for creating an issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssuePayload {
    /// Issue fields
    pub fields: CreateIssueFields,
}

/// Fields for creating an issue.
///
/// Project, summary, and issue type are always present; every other
/// field is included only when the caller supplied it.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueFields {
    /// Project
    pub project: KeyRef,
    /// Summary (title)
    pub summary: String,
    /// Issue type
    pub issuetype: NameRef,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels, passed through as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Components, each wrapped as `{name}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<NameRef>>,
    /// Priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NameRef>,
    /// Assignee, by account ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<AccountRef>,
    /// Reporter, by account ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<AccountRef>,
    /// Parent issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<KeyRef>,
}

/// Reference by key (projects, parent issues).
#[derive(Debug, Clone, Serialize)]
pub struct KeyRef {
    /// Key (e.g., "PROJ")
    pub key: String,
}

/// Reference by name (issue types, components, priorities).
#[derive(Debug, Clone, Serialize)]
pub struct NameRef {
    /// Name
    pub name: String,
}

/// Reference by account ID (assignee, reporter).
#[derive(Debug, Clone, Serialize)]
pub struct AccountRef {
    /// Account ID
    #[serde(rename = "accountId")]
    pub account_id: String,
}

/// Response from POST /issue.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueResponse {
    /// Issue ID
    pub id: String,
    /// Issue key (e.g., "PROJ-123")
    pub key: String,
}
