//! Error types for issuebridge.

use thiserror::Error;

/// Main error type for issuebridge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is missing or malformed (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tool call named a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool was registered twice under the same name
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// Tool arguments did not satisfy the declared parameter schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A write targeted a session that is no longer registered
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// HTTP request to the tracker failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(String),

    /// Tracker API returned an error response
    #[error("Tracker API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Map an HTTP status + body from the tracker into an error.
    pub fn from_status(status: u16, message: String) -> Self {
        Error::Api { status, message }
    }

    /// True for failures the dispatch layer reports back to the calling
    /// client as an error result (the session stays open).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

/// Result type alias for issuebridge operations.
pub type Result<T> = std::result::Result<T, Error>;
