//! JSON-RPC 2.0 messages and a line-delimited request multiplexer.
//!
//! [`JsonRpcChannel`] owns the write half of a byte stream and a reader task
//! on the read half. Requests are tagged with a fresh id and parked until the
//! reader routes the matching response back, so any number of callers may
//! have requests in flight on one stream.

use crate::mcp_client::ports::{McpSessionError, McpSessionResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex as AsyncMutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Protocol version tag carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

const METHOD_NOT_FOUND: i64 = -32601;
const INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: &'static str,
    /// Request id echoed by the response.
    pub id: u64,
    /// Method name.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(id: u64, method: &str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.to_owned(),
            params,
        }
    }
}

/// JSON-RPC 2.0 notification message (no response expected).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: &'static str,
    /// Method name.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a notification.
    #[must_use]
    pub fn new(method: &str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.to_owned(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response message (success or error).
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Id of the request being answered.
    #[serde(default)]
    pub id: Value,
    /// Success payload.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error payload.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: String,
    /// Optional structured detail.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Extracts the result from a response, converting error objects.
///
/// # Errors
///
/// Returns [`McpSessionError::Rpc`] when the response carries an error or
/// lacks both a result and an error.
pub fn extract_result(response: JsonRpcResponse) -> McpSessionResult<Value> {
    if let Some(error) = response.error {
        return Err(McpSessionError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    response.result.ok_or_else(|| McpSessionError::Rpc {
        code: INTERNAL_ERROR,
        message: "response missing both result and error".to_owned(),
    })
}

/// A message received from the peer.
#[derive(Debug)]
pub enum Incoming {
    /// Answer to one of our requests.
    Response(JsonRpcResponse),
    /// Request initiated by the peer.
    Request {
        /// Peer-chosen id to echo.
        id: Value,
        /// Method name.
        method: String,
    },
    /// Notification initiated by the peer.
    Notification {
        /// Method name.
        method: String,
    },
}

impl Incoming {
    /// Classifies a decoded JSON value; `None` when it is not JSON-RPC.
    #[must_use]
    pub fn classify(value: Value) -> Option<Self> {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let id = value.get("id").filter(|id| !id.is_null()).cloned();
        match (method, id) {
            (Some(method_name), Some(request_id)) => Some(Self::Request {
                id: request_id,
                method: method_name,
            }),
            (Some(method_name), None) => Some(Self::Notification {
                method: method_name,
            }),
            (None, _) => serde_json::from_value(value).ok().map(Self::Response),
        }
    }
}

/// Builds the reply to a peer-initiated request.
///
/// Only `ping` is supported; every other method is answered with
/// "method not found".
#[must_use]
pub fn reply_to_peer_request(id: &Value, method: &str) -> Value {
    if method == "ping" {
        json!({"jsonrpc": JSONRPC_VERSION, "id": id, "result": {}})
    } else {
        json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": id,
            "error": {"code": METHOD_NOT_FOUND, "message": format!("method '{method}' not supported")}
        })
    }
}

type SharedWriter = Arc<AsyncMutex<Box<dyn AsyncWrite + Send + Unpin>>>;

#[derive(Default)]
struct PendingRequests {
    waiters: HashMap<u64, oneshot::Sender<JsonRpcResponse>>,
    closed: bool,
}

fn lock(pending: &Mutex<PendingRequests>) -> MutexGuard<'_, PendingRequests> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes a parked request when its caller stops waiting.
struct PendingRegistration<'a> {
    pending: &'a Mutex<PendingRequests>,
    id: u64,
}

impl Drop for PendingRegistration<'_> {
    fn drop(&mut self) {
        lock(self.pending).waiters.remove(&self.id);
    }
}

/// Multiplexed JSON-RPC client over a line-delimited byte stream.
pub struct JsonRpcChannel {
    server: String,
    writer: SharedWriter,
    pending: Arc<Mutex<PendingRequests>>,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
}

impl JsonRpcChannel {
    /// Starts the reader task and returns the channel.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<R, W>(server: impl Into<String>, reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let server_name = server.into();
        let shared_writer: SharedWriter = Arc::new(AsyncMutex::new(Box::new(writer)));
        let pending = Arc::new(Mutex::new(PendingRequests::default()));
        let reader_task = tokio::spawn(read_loop(
            server_name.clone(),
            BufReader::new(reader),
            Arc::clone(&shared_writer),
            Arc::clone(&pending),
        ));

        Self {
            server: server_name,
            writer: shared_writer,
            pending,
            next_id: AtomicU64::new(1),
            reader: reader_task,
        }
    }

    /// Sends a request and waits for the matching response.
    ///
    /// Dropping the returned future abandons the request; a late response is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`McpSessionError::Closed`] when the stream has ended,
    /// [`McpSessionError::Io`] when writing fails, and
    /// [`McpSessionError::Rpc`] when the peer answers with an error.
    pub async fn request(&self, method: &str, params: Option<Value>) -> McpSessionResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();
        {
            let mut pending = lock(&self.pending);
            if pending.closed {
                return Err(McpSessionError::Closed);
            }
            pending.waiters.insert(id, sender);
        }
        let _registration = PendingRegistration {
            pending: &self.pending,
            id,
        };

        trace!(server = %self.server, id, method, "sending JSON-RPC request");
        write_message(&self.writer, &JsonRpcRequest::new(id, method, params)).await?;
        let response = receiver.await.map_err(|_| McpSessionError::Closed)?;
        extract_result(response)
    }

    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns [`McpSessionError::Io`] when writing fails.
    pub async fn notify(&self, method: &str, params: Option<Value>) -> McpSessionResult<()> {
        write_message(&self.writer, &JsonRpcNotification::new(method, params)).await
    }

    /// Closes the write half so the peer sees end-of-input.
    ///
    /// # Errors
    ///
    /// Returns [`McpSessionError::Io`] when shutting the stream down fails.
    pub async fn close_input(&self) -> McpSessionResult<()> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(McpSessionError::io)
    }

    /// Returns whether the read half has ended.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock(&self.pending).closed
    }
}

impl Drop for JsonRpcChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn write_message<T: Serialize>(writer: &SharedWriter, message: &T) -> McpSessionResult<()> {
    let mut line =
        serde_json::to_vec(message).map_err(|err| McpSessionError::Protocol(err.to_string()))?;
    line.push(b'\n');

    let mut stream = writer.lock().await;
    stream.write_all(&line).await.map_err(McpSessionError::io)?;
    stream.flush().await.map_err(McpSessionError::io)
}

async fn read_loop<R>(
    server: String,
    mut reader: BufReader<R>,
    writer: SharedWriter,
    pending: Arc<Mutex<PendingRequests>>,
) where
    R: AsyncRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(server = %server, error = %err, "MCP transport read failed");
                break;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
            trace!(server = %server, line = trimmed, "skipping non-JSON output");
            continue;
        };

        match Incoming::classify(value) {
            Some(Incoming::Response(response)) => route_response(&server, &pending, response),
            Some(Incoming::Request { id, method }) => {
                let reply = reply_to_peer_request(&id, &method);
                if let Err(err) = write_message(&writer, &reply).await {
                    warn!(server = %server, method = %method, error = %err, "failed to answer server request");
                }
            }
            Some(Incoming::Notification { method }) => {
                debug!(server = %server, method = %method, "ignoring server notification");
            }
            None => trace!(server = %server, "skipping non-JSON-RPC message"),
        }
    }

    let mut state = lock(&pending);
    state.closed = true;
    state.waiters.clear();
    debug!(server = %server, "MCP transport stream ended");
}

fn route_response(server: &str, pending: &Mutex<PendingRequests>, response: JsonRpcResponse) {
    let Some(id) = response.id.as_u64() else {
        trace!(server, "response without a numeric id");
        return;
    };
    let waiter = lock(pending).waiters.remove(&id);
    match waiter {
        Some(sender) => {
            if sender.send(response).is_err() {
                trace!(server, id, "caller stopped waiting for response");
            }
        }
        None => trace!(server, id, "response for unknown request"),
    }
}
