//! Session lifecycle management.
//!
//! One session per connected client stream. The manager owns the map
//! from session identifier to stream handle; the dispatch path borrows a
//! handle by identifier for the duration of one write. Identifiers are
//! UUIDs and are never reused within a process lifetime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use issuebridge_core::{Error, Result};
use tokio::sync::{mpsc, Mutex, MutexGuard, RwLock};
use uuid::Uuid;

/// Outbound event buffer per session.
const SESSION_CHANNEL_CAPACITY: usize = 64;

/// Lifecycle state of a session. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

/// One event pushed onto a session's stream.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    /// SSE event name
    pub event: &'static str,
    /// SSE data payload
    pub data: String,
}

impl OutboundEvent {
    /// The handshake event advertising the message callback URI.
    pub fn endpoint(uri: String) -> Self {
        Self {
            event: "endpoint",
            data: uri,
        }
    }

    /// A JSON-RPC message for the client.
    pub fn message(json: String) -> Self {
        Self {
            event: "message",
            data: json,
        }
    }
}

struct SessionInner {
    id: String,
    outbound: mpsc::Sender<OutboundEvent>,
    state: StdMutex<SessionState>,
    // Serializes invocations within the session: a result is written
    // before the next invocation starts processing.
    dispatch_lock: Mutex<()>,
}

/// Shared handle to one registered session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    /// The session identifier.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.inner.state.lock().expect("session state lock poisoned")
    }

    /// Transition `Connecting -> Open` once the handshake event has been
    /// handed to the client stream. No-op in any other state.
    pub fn mark_open(&self) {
        let mut state = self.inner.state.lock().expect("session state lock poisoned");
        if *state == SessionState::Connecting {
            *state = SessionState::Open;
        }
    }

    fn mark_closed(&self) {
        let mut state = self.inner.state.lock().expect("session state lock poisoned");
        *state = SessionState::Closed;
    }

    /// Acquire the per-session dispatch lock.
    pub async fn lock_dispatch(&self) -> MutexGuard<'_, ()> {
        self.inner.dispatch_lock.lock().await
    }

    /// Resolves once the client stream has gone away (receiver dropped).
    pub async fn stream_gone(&self) {
        self.inner.outbound.closed().await
    }
}

/// Owner of all live sessions.
#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionManager {
    /// Create an empty session manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its handle plus the receiving
    /// end of its outbound stream. The session starts in `Connecting`.
    pub async fn open(&self) -> (SessionHandle, mpsc::Receiver<OutboundEvent>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        let handle = SessionHandle {
            inner: Arc::new(SessionInner {
                id: id.clone(),
                outbound: tx,
                state: StdMutex::new(SessionState::Connecting),
                dispatch_lock: Mutex::new(()),
            }),
        };

        self.sessions.write().await.insert(id.clone(), handle.clone());
        tracing::debug!(session = id, "Session registered");

        (handle, rx)
    }

    /// Look up a live session by identifier.
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Deregister a session. Idempotent: closing an already-closed or
    /// unknown session is a no-op.
    pub async fn close(&self, id: &str) {
        if let Some(handle) = self.sessions.write().await.remove(id) {
            handle.mark_closed();
            tracing::debug!(session = id, "Session closed");
        }
    }

    /// Write an event to a session's stream.
    ///
    /// Fails with `UnknownSession` when the identifier is not currently
    /// registered or the client stream has gone away; callers log and
    /// discard, never surface this to any client.
    pub async fn send(&self, id: &str, event: OutboundEvent) -> Result<()> {
        let handle = {
            let sessions = self.sessions.read().await;
            sessions
                .get(id)
                .cloned()
                .ok_or_else(|| Error::UnknownSession(id.to_string()))?
        };

        if handle.inner.outbound.send(event).await.is_err() {
            // Receiver dropped under us: the stream closed mid-write.
            self.close(id).await;
            return Err(Error::UnknownSession(id.to_string()));
        }

        Ok(())
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
