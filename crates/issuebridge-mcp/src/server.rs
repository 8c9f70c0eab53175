//! The dispatch server.
//!
//! Serves the MCP lifecycle over HTTP:
//! - `GET /sse` opens a session and returns its long-lived SSE stream;
//!   the first event advertises the session's message callback URI
//! - `POST /messages?sessionId=...` carries JSON-RPC from the client;
//!   responses are pushed back on the session's stream
//! - `GET /status` is a static liveness check
//!
//! Invocations are processed one at a time per session; sessions are
//! independent and run concurrently. Per-invocation failures become
//! error results on the stream; nothing a tool does can take down a
//! session or the process.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{Stream, StreamExt};
use issuebridge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_stream::wrappers::ReceiverStream;

use crate::protocol::{
    parse_incoming, IncomingMessage, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, RequestId, ServerCapabilities, ServerInfo, ToolCallParams,
    ToolsCapability, ToolsListResult, MCP_VERSION,
};
use crate::registry::ToolRegistry;
use crate::session::{OutboundEvent, SessionManager};

/// Path the client posts JSON-RPC messages to.
const MESSAGES_PATH: &str = "/messages";

/// Shared state behind the HTTP handlers.
#[derive(Clone)]
struct AppState {
    registry: Arc<ToolRegistry>,
    sessions: Arc<SessionManager>,
}

/// MCP server over an SSE transport.
pub struct BridgeServer {
    state: AppState,
}

impl BridgeServer {
    /// Create a server around a fixed tool registry.
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            state: AppState {
                registry: Arc::new(registry),
                sessions: Arc::new(SessionManager::new()),
            },
        }
    }

    /// The session manager owning all live sessions.
    pub fn sessions(&self) -> Arc<SessionManager> {
        self.state.sessions.clone()
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/sse", get(sse_handler))
            .route(MESSAGES_PATH, post(messages_handler))
            .route("/status", get(status_handler))
            .with_state(self.state.clone())
    }

    /// Bind and serve until a shutdown signal arrives.
    pub async fn serve(self, port: u16) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind port {}: {}", port, e)))?;

        tracing::info!(%addr, "MCP bridge listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Other(e.into()))?;

        tracing::info!("MCP bridge stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}

/// Absolute callback URI for a session, derived from the request's Host
/// header plus the fixed messages path.
fn callback_url(host: &str, session_id: &str) -> String {
    format!("http://{}{}?sessionId={}", host, MESSAGES_PATH, session_id)
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /status: liveness check.
async fn status_handler() -> &'static str {
    "Jira MCP bridge is running"
}

/// GET /sse: open a session and hand back its push stream.
async fn sse_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (handle, rx) = state.sessions.open().await;
    let session_id = handle.id().to_string();

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let endpoint = OutboundEvent::endpoint(callback_url(host, &session_id));

    // The channel is freshly created, so queueing the handshake event
    // cannot fail; once it is in the stream the session is open.
    if state.sessions.send(&session_id, endpoint).await.is_ok() {
        handle.mark_open();
    }

    tracing::info!(session = session_id, "Client connected");

    // Deregister once the client stream goes away (disconnect, network
    // drop, or shutdown). Closed is terminal.
    let sessions = state.sessions.clone();
    let watched = handle.clone();
    tokio::spawn(async move {
        watched.stream_gone().await;
        tracing::info!(session = watched.id(), "Client disconnected");
        sessions.close(watched.id()).await;
    });

    let stream = ReceiverStream::new(rx)
        .map(|e| Ok(Event::default().event(e.event).data(e.data)));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// POST /messages: receive one JSON-RPC message for a session.
async fn messages_handler(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Json(payload): Json<Value>,
) -> (StatusCode, &'static str) {
    process_message(&state, &query.session_id, payload).await
}

/// Dispatch one incoming payload for a session.
async fn process_message(
    state: &AppState,
    session_id: &str,
    payload: Value,
) -> (StatusCode, &'static str) {
    let Some(handle) = state.sessions.get(session_id).await else {
        tracing::warn!(session = session_id, "Message for unknown session");
        return (StatusCode::NOT_FOUND, "Unknown session");
    };

    let Some(message) = parse_incoming(&payload) else {
        return (StatusCode::BAD_REQUEST, "Invalid JSON-RPC message");
    };

    // One invocation at a time per session: the previous result is on
    // the stream before the next invocation starts processing.
    let _guard = handle.lock_dispatch().await;

    match message {
        IncomingMessage::Notification(notification) => {
            handle_notification(&notification.method);
        }
        IncomingMessage::Request(request) => {
            let response = handle_request(state, request).await;
            let json = match serde_json::to_string(&response) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize response");
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Serialization failure");
                }
            };

            // The session may have closed while a handler was awaiting
            // the tracker; a late result is discarded, never surfaced.
            if let Err(e) = state
                .sessions
                .send(session_id, OutboundEvent::message(json))
                .await
            {
                tracing::warn!(session = session_id, error = %e, "Discarding result for closed session");
            }
        }
    }

    (StatusCode::ACCEPTED, "Accepted")
}

/// Handle notifications (no response).
fn handle_notification(method: &str) {
    match method {
        "notifications/initialized" | "initialized" => {
            tracing::info!("Client initialized");
        }
        "notifications/cancelled" => {
            tracing::debug!("Request cancelled by client");
        }
        _ => {
            tracing::debug!(method = method, "Ignoring notification");
        }
    }
}

/// Handle a JSON-RPC request.
async fn handle_request(state: &AppState, req: JsonRpcRequest) -> JsonRpcResponse {
    tracing::debug!(method = req.method, "Handling request");

    match req.method.as_str() {
        "initialize" => handle_initialize(req.id, req.params),
        "tools/list" => success(
            req.id,
            ToolsListResult {
                tools: state.registry.definitions(),
            },
        ),
        "tools/call" => handle_tools_call(state, req.id, req.params).await,
        "ping" => JsonRpcResponse::success(req.id, serde_json::json!({})),
        method => {
            tracing::warn!(method = method, "Unknown method");
            JsonRpcResponse::error(req.id, JsonRpcError::method_not_found(method))
        }
    }
}

/// Handle the initialize handshake.
fn handle_initialize(id: RequestId, params: Option<Value>) -> JsonRpcResponse {
    if let Some(params) = params {
        match serde_json::from_value::<InitializeParams>(params) {
            Ok(init) => {
                tracing::info!(
                    client = init.client_info.name,
                    version = init.client_info.version,
                    protocol = init.protocol_version,
                    "Client handshake"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse initialize params");
            }
        }
    }

    success(
        id,
        InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "issuebridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        },
    )
}

/// Handle tools/call.
async fn handle_tools_call(
    state: &AppState,
    id: RequestId,
    params: Option<Value>,
) -> JsonRpcResponse {
    let params: ToolCallParams = match params {
        Some(p) => match serde_json::from_value(p) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params(&e.to_string()));
            }
        },
        None => {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
        }
    };

    tracing::info!(tool = params.name, "Calling tool");

    let result = state.registry.dispatch(&params.name, params.arguments).await;
    success(id, result)
}

fn success<T: Serialize>(id: RequestId, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(&e.to_string())),
    }
}
