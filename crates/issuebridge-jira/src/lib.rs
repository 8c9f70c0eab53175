//! Jira Cloud adapter for issuebridge.
//!
//! Implements the `IssueTracker` boundary against the Jira REST API.

pub mod client;
pub mod types;

pub use client::JiraClient;
