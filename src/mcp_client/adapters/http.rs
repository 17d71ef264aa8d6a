//! Streamable HTTP transport: JSON-RPC over POST with optional SSE replies.

use super::jsonrpc::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, extract_result};
use super::protocol::RpcTransport;
use crate::mcp_client::ports::{McpSessionError, McpSessionResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

/// Header carrying the server-assigned session id.
pub const SESSION_HEADER: &str = "mcp-session-id";

const ACCEPT_BOTH: &str = "application/json, text/event-stream";

/// JSON-RPC client for one remote tool-server endpoint.
pub struct HttpRpc {
    server: String,
    url: String,
    client: Client,
    session_id: Mutex<Option<String>>,
    next_id: AtomicU64,
}

impl HttpRpc {
    /// Creates a transport bound to `url`. No request is sent yet.
    #[must_use]
    pub fn new(server: impl Into<String>, url: impl Into<String>, client: Client) -> Self {
        Self {
            server: server.into(),
            url: url.into(),
            client,
            session_id: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the session id the server assigned, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn remember_session(&self, headers: &HeaderMap) {
        if let Some(value) = headers
            .get(SESSION_HEADER)
            .and_then(|header| header.to_str().ok())
        {
            *self
                .session_id
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(value.to_owned());
        }
    }

    async fn post<T: Serialize + Sync>(&self, message: &T) -> McpSessionResult<Response> {
        let mut request = self
            .client
            .post(&self.url)
            .header(ACCEPT, ACCEPT_BOTH)
            .json(message);
        if let Some(id) = self.session_id() {
            request = request.header(SESSION_HEADER, id);
        }

        let response = request.send().await.map_err(McpSessionError::io)?;
        self.remember_session(response.headers());

        let status = response.status();
        if status == StatusCode::NOT_FOUND && self.session_id().is_some() {
            return Err(McpSessionError::Closed);
        }
        if !status.is_success() {
            return Err(McpSessionError::Protocol(format!(
                "server '{}' answered HTTP {status}",
                self.server
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl RpcTransport for HttpRpc {
    async fn request(&self, method: &str, params: Option<Value>) -> McpSessionResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        trace!(server = %self.server, id, method, "posting JSON-RPC request");
        let response = self.post(&JsonRpcRequest::new(id, method, params)).await?;

        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/event-stream"));
        let body = response.text().await.map_err(McpSessionError::io)?;

        let answer = if is_event_stream {
            find_in_event_stream(&body, id)?
        } else {
            serde_json::from_str::<JsonRpcResponse>(&body).map_err(|err| {
                McpSessionError::Protocol(format!("malformed JSON-RPC response: {err}"))
            })?
        };
        extract_result(answer)
    }

    async fn notify(&self, method: &str, params: Option<Value>) -> McpSessionResult<()> {
        self.post(&JsonRpcNotification::new(method, params))
            .await
            .map(|_| ())
    }

    async fn shutdown(&self) -> McpSessionResult<()> {
        let Some(id) = self.session_id() else {
            return Ok(());
        };
        let outcome = self
            .client
            .delete(&self.url)
            .header(SESSION_HEADER, id)
            .send()
            .await;
        if let Err(err) = outcome {
            debug!(server = %self.server, error = %err, "session termination request failed");
        }
        Ok(())
    }
}

/// Scans SSE `data:` payloads for the response to request `id`.
fn find_in_event_stream(body: &str, id: u64) -> McpSessionResult<JsonRpcResponse> {
    let wanted = json!(id);
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<JsonRpcResponse>(data.trim()).ok())
        .find(|response| response.id == wanted)
        .ok_or_else(|| {
            McpSessionError::Protocol(format!("event stream ended without a response to {id}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_stream_scan_skips_unrelated_events() {
        let body = concat!(
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\"}\n\n",
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":7,\"result\":{\"ok\":true}}\n\n",
        );

        let response = find_in_event_stream(body, 7).expect("response should be found");
        assert_eq!(response.result, Some(json!({"ok": true})));
    }

    #[test]
    fn event_stream_without_answer_is_a_protocol_error() {
        let body = "data: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n\n";
        let result = find_in_event_stream(body, 2);
        assert!(matches!(result, Err(McpSessionError::Protocol(_))));
    }
}
