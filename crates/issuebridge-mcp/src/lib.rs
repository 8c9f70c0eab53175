//! MCP (Model Context Protocol) server for issuebridge.
//!
//! Exposes the issue-tracker tools over a long-lived SSE connection:
//! one stream per client session, JSON-RPC messages posted to a
//! per-session callback endpoint, results pushed back on the stream.

pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod tools;

pub use registry::ToolRegistry;
pub use server::BridgeServer;
pub use session::SessionManager;
