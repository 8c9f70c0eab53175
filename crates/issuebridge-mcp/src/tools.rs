//! The issue-tracker tool handlers.
//!
//! Two tools are exposed: `create_issue` and `get_issues`. Both are thin
//! translations from validated tool arguments to the `IssueTracker`
//! boundary and back into a text result.

use std::sync::Arc;

use async_trait::async_trait;
use issuebridge_core::types::{CreateIssueInput, IssueQuery};
use issuebridge_core::{Error, IssueTracker, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::protocol::ToolCallResult;
use crate::registry::{ParamKind, ParamSpec, ToolHandler, ToolRegistry, ToolSpec};

/// Build the fixed tool registry over a tracker.
pub fn build_registry(tracker: Arc<dyn IssueTracker>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(
        CreateIssueTool::spec(),
        Arc::new(CreateIssueTool::new(tracker.clone())),
    )?;
    registry.register(GetIssuesTool::spec(), Arc::new(GetIssuesTool::new(tracker)))?;
    Ok(registry)
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| Error::InvalidArguments(e.to_string()))
}

// =============================================================================
// create_issue
// =============================================================================

/// Creates an issue in the configured tracker.
pub struct CreateIssueTool {
    tracker: Arc<dyn IssueTracker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIssueArgs {
    project_key: String,
    summary: String,
    issue_type: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    reporter: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    components: Vec<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    parent: Option<String>,
}

impl CreateIssueTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: "create_issue",
            description: "Create a new issue in the configured Jira project",
            params: vec![
                ParamSpec {
                    name: "projectKey",
                    description: "Project key the issue belongs to (e.g. PROJ)",
                    kind: ParamKind::Text,
                    required: true,
                },
                ParamSpec {
                    name: "summary",
                    description: "Issue summary (title)",
                    kind: ParamKind::Text,
                    required: true,
                },
                ParamSpec {
                    name: "issueType",
                    description: "Issue type name (e.g. Task, Bug, Story)",
                    kind: ParamKind::Text,
                    required: true,
                },
                ParamSpec {
                    name: "description",
                    description: "Issue description",
                    kind: ParamKind::Text,
                    required: false,
                },
                ParamSpec {
                    name: "assignee",
                    description: "Assignee account id, name, or email",
                    kind: ParamKind::Text,
                    required: false,
                },
                ParamSpec {
                    name: "reporter",
                    description: "Reporter account id, name, or email",
                    kind: ParamKind::Text,
                    required: false,
                },
                ParamSpec {
                    name: "labels",
                    description: "Labels to apply",
                    kind: ParamKind::TextList,
                    required: false,
                },
                ParamSpec {
                    name: "components",
                    description: "Component names to associate",
                    kind: ParamKind::TextList,
                    required: false,
                },
                ParamSpec {
                    name: "priority",
                    description: "Priority name (e.g. High)",
                    kind: ParamKind::Text,
                    required: false,
                },
                ParamSpec {
                    name: "parent",
                    description: "Parent issue key, for subtasks",
                    kind: ParamKind::Text,
                    required: false,
                },
            ],
        }
    }
}

#[async_trait]
impl ToolHandler for CreateIssueTool {
    async fn call(&self, args: Map<String, Value>) -> Result<ToolCallResult> {
        let args: CreateIssueArgs = parse_args(args)?;

        let input = CreateIssueInput {
            project_key: args.project_key,
            summary: args.summary,
            issue_type: args.issue_type,
            description: args.description,
            assignee: args.assignee,
            reporter: args.reporter,
            labels: args.labels,
            components: args.components,
            priority: args.priority,
            parent: args.parent,
        };

        let created = self.tracker.create_issue(input).await?;

        Ok(ToolCallResult::text(format!(
            "Created issue {}: {}",
            created.key, created.url
        )))
    }
}

// =============================================================================
// get_issues
// =============================================================================

/// Lists issues of a project, optionally narrowed by a JQL fragment.
pub struct GetIssuesTool {
    tracker: Arc<dyn IssueTracker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetIssuesArgs {
    project_key: String,
    #[serde(default)]
    jql: Option<String>,
}

impl GetIssuesTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: "get_issues",
            description: "List issues of a Jira project, optionally filtered by a JQL clause",
            params: vec![
                ParamSpec {
                    name: "projectKey",
                    description: "Project key to list issues from (e.g. PROJ)",
                    kind: ParamKind::Text,
                    required: true,
                },
                ParamSpec {
                    name: "jql",
                    description: "Extra JQL clause ANDed with the project filter",
                    kind: ParamKind::Text,
                    required: false,
                },
            ],
        }
    }
}

#[async_trait]
impl ToolHandler for GetIssuesTool {
    async fn call(&self, args: Map<String, Value>) -> Result<ToolCallResult> {
        let args: GetIssuesArgs = parse_args(args)?;

        let issues = self
            .tracker
            .search_issues(IssueQuery {
                project_key: args.project_key,
                jql: args.jql,
            })
            .await?;

        Ok(ToolCallResult::text(serde_json::to_string_pretty(&issues)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuebridge_core::types::{CreatedIssue, IssueSummary, TrackerUser};
    use std::sync::Mutex;

    /// Mock tracker recording inputs and returning canned results.
    struct MockTracker {
        created: Mutex<Vec<CreateIssueInput>>,
        queries: Mutex<Vec<IssueQuery>>,
        issues: Vec<IssueSummary>,
        fail: bool,
    }

    impl MockTracker {
        fn new() -> Self {
            Self {
                created: Mutex::new(vec![]),
                queries: Mutex::new(vec![]),
                issues: vec![
                    IssueSummary {
                        key: "PROJ-1".to_string(),
                        summary: Some("Fix login bug".to_string()),
                        status: Some("Open".to_string()),
                        priority: Some("High".to_string()),
                        assignee: Some("John Doe".to_string()),
                        issue_type: Some("Bug".to_string()),
                        url: "https://team.atlassian.net/browse/PROJ-1".to_string(),
                    },
                    IssueSummary {
                        key: "PROJ-2".to_string(),
                        summary: Some("Add dark mode".to_string()),
                        status: None,
                        priority: None,
                        assignee: None,
                        issue_type: None,
                        url: "https://team.atlassian.net/browse/PROJ-2".to_string(),
                    },
                ],
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl IssueTracker for MockTracker {
        async fn create_issue(&self, input: CreateIssueInput) -> Result<CreatedIssue> {
            if self.fail {
                return Err(Error::Api {
                    status: 403,
                    message: "Forbidden".to_string(),
                });
            }
            self.created.lock().unwrap().push(input);
            Ok(CreatedIssue {
                key: "PROJ-42".to_string(),
                url: "https://team.atlassian.net/browse/PROJ-42".to_string(),
            })
        }

        async fn search_users(&self, _query: &str) -> Result<Vec<TrackerUser>> {
            Ok(vec![])
        }

        async fn search_issues(&self, query: IssueQuery) -> Result<Vec<IssueSummary>> {
            if self.fail {
                return Err(Error::Http("connection reset".to_string()));
            }
            self.queries.lock().unwrap().push(query);
            Ok(self.issues.clone())
        }
    }

    fn args(json: Value) -> Map<String, Value> {
        match json {
            Value::Object(map) => map,
            _ => panic!("test args must be an object"),
        }
    }

    #[tokio::test]
    async fn test_create_issue_result_text() {
        let tracker = Arc::new(MockTracker::new());
        let tool = CreateIssueTool::new(tracker.clone());

        let result = tool
            .call(args(serde_json::json!({
                "projectKey": "PROJ",
                "summary": "Fix login bug",
                "issueType": "Bug"
            })))
            .await
            .unwrap();

        assert!(result.is_error.is_none());
        assert_eq!(
            result.first_text(),
            "Created issue PROJ-42: https://team.atlassian.net/browse/PROJ-42"
        );

        let created = tracker.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].project_key, "PROJ");
        assert_eq!(created[0].issue_type, "Bug");
        assert!(created[0].assignee.is_none());
        assert!(created[0].labels.is_empty());
    }

    #[tokio::test]
    async fn test_create_issue_passes_optional_fields() {
        let tracker = Arc::new(MockTracker::new());
        let tool = CreateIssueTool::new(tracker.clone());

        tool.call(args(serde_json::json!({
            "projectKey": "PROJ",
            "summary": "Fix login bug",
            "issueType": "Bug",
            "assignee": "jdoe",
            "labels": ["auth"],
            "components": ["frontend"],
            "priority": "High",
            "parent": "PROJ-100"
        })))
        .await
        .unwrap();

        let created = tracker.created.lock().unwrap();
        assert_eq!(created[0].assignee.as_deref(), Some("jdoe"));
        assert_eq!(created[0].labels, vec!["auth"]);
        assert_eq!(created[0].components, vec!["frontend"]);
        assert_eq!(created[0].priority.as_deref(), Some("High"));
        assert_eq!(created[0].parent.as_deref(), Some("PROJ-100"));
    }

    #[tokio::test]
    async fn test_create_issue_type_mismatch_is_invalid_arguments() {
        let tool = CreateIssueTool::new(Arc::new(MockTracker::new()));

        let err = tool
            .call(args(serde_json::json!({
                "projectKey": "PROJ",
                "summary": "Fix login bug",
                "issueType": "Bug",
                "labels": "not-an-array"
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_create_issue_tracker_failure_propagates() {
        let tool = CreateIssueTool::new(Arc::new(MockTracker::failing()));

        let err = tool
            .call(args(serde_json::json!({
                "projectKey": "PROJ",
                "summary": "Fix login bug",
                "issueType": "Bug"
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_get_issues_round_trip() {
        let tracker = Arc::new(MockTracker::new());
        let tool = GetIssuesTool::new(tracker.clone());

        let result = tool
            .call(args(serde_json::json!({
                "projectKey": "PROJ",
                "jql": "status = Open"
            })))
            .await
            .unwrap();

        // Serializing then parsing preserves key order
        let parsed: Vec<IssueSummary> = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].key, "PROJ-1");
        assert_eq!(parsed[1].key, "PROJ-2");
        assert_eq!(parsed[0].assignee.as_deref(), Some("John Doe"));
        assert!(parsed[1].status.is_none());

        let queries = tracker.queries.lock().unwrap();
        assert_eq!(queries[0].project_key, "PROJ");
        assert_eq!(queries[0].jql.as_deref(), Some("status = Open"));
    }

    #[tokio::test]
    async fn test_get_issues_without_jql() {
        let tracker = Arc::new(MockTracker::new());
        let tool = GetIssuesTool::new(tracker.clone());

        tool.call(args(serde_json::json!({"projectKey": "PROJ"})))
            .await
            .unwrap();

        let queries = tracker.queries.lock().unwrap();
        assert!(queries[0].jql.is_none());
    }

    #[tokio::test]
    async fn test_build_registry_holds_both_tools() {
        let registry = build_registry(Arc::new(MockTracker::new())).unwrap();

        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "create_issue");
        assert_eq!(defs[1].name, "get_issues");
        assert_eq!(defs[0].input_schema["properties"]["projectKey"]["type"], "string");
    }

    #[tokio::test]
    async fn test_registry_dispatch_end_to_end() {
        let registry = build_registry(Arc::new(MockTracker::new())).unwrap();

        let result = registry
            .dispatch(
                "get_issues",
                Some(serde_json::json!({"projectKey": "PROJ"})),
            )
            .await;
        assert!(result.is_error.is_none());

        let result = registry.dispatch("delete-issue", None).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.first_text(), "Unknown tool: delete-issue");
    }
}
