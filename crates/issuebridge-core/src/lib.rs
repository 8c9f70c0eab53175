//! Core traits, types, and error handling for issuebridge.
//!
//! This crate provides the foundational abstractions shared by the MCP
//! server and the issue-tracker adapter.

pub mod config;
pub mod error;
pub mod tracker;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use tracker::IssueTracker;
