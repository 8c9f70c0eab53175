//! Adapter boundary for the remote issue tracker.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CreateIssueInput, CreatedIssue, IssueQuery, IssueSummary, TrackerUser};

/// Boundary to the external issue tracker.
///
/// Tool handlers only talk to the tracker through this trait; the
/// concrete HTTP client lives behind it.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Create an issue and return its key plus a browsable URL.
    async fn create_issue(&self, input: CreateIssueInput) -> Result<CreatedIssue>;

    /// Search tracker users matching a free-text query.
    async fn search_users(&self, query: &str) -> Result<Vec<TrackerUser>>;

    /// List issues of a project, optionally narrowed by an extra filter.
    async fn search_issues(&self, query: IssueQuery) -> Result<Vec<IssueSummary>>;
}
