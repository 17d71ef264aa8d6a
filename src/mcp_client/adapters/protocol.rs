//! MCP handshake, discovery, and invocation over any JSON-RPC transport.

use crate::mcp_client::ports::{DiscoveredTool, McpSession, McpSessionError, McpSessionResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

/// MCP protocol revision requested during `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

const CLIENT_NAME: &str = "switchboard";
const MAX_DISCOVERY_PAGES: usize = 64;

/// Request/notification primitive a transport provides.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Sends a request and returns its result payload.
    async fn request(&self, method: &str, params: Option<Value>) -> McpSessionResult<Value>;

    /// Sends a notification.
    async fn notify(&self, method: &str, params: Option<Value>) -> McpSessionResult<()>;

    /// Releases transport resources.
    async fn shutdown(&self) -> McpSessionResult<()>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolListPage {
    #[serde(default)]
    tools: Vec<AdvertisedTool>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvertisedTool {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    input_schema: Option<Value>,
}

impl From<AdvertisedTool> for DiscoveredTool {
    fn from(tool: AdvertisedTool) -> Self {
        Self::new(
            tool.name,
            tool.description.unwrap_or_default(),
            tool.input_schema.unwrap_or_else(|| json!({})),
        )
    }
}

/// An initialized MCP session over transport `T`.
pub struct ProtocolSession<T> {
    server: String,
    transport: T,
}

impl<T> ProtocolSession<T>
where
    T: RpcTransport,
{
    /// Performs the `initialize` handshake and announces readiness.
    ///
    /// # Errors
    ///
    /// Returns the transport's error, or [`McpSessionError::Protocol`] when
    /// the server's answer is not an object.
    pub async fn initialize(server: impl Into<String>, transport: T) -> McpSessionResult<Self> {
        let server_name = server.into();
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {"name": CLIENT_NAME, "version": env!("CARGO_PKG_VERSION")}
        });
        let answer = transport.request("initialize", Some(params)).await?;
        if !answer.is_object() {
            return Err(McpSessionError::Protocol(format!(
                "initialize returned {answer} instead of an object"
            )));
        }
        let protocol_version = answer
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        debug!(server = %server_name, protocol_version, "MCP handshake complete");

        transport.notify("notifications/initialized", None).await?;
        Ok(Self {
            server: server_name,
            transport,
        })
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T> McpSession for ProtocolSession<T>
where
    T: RpcTransport,
{
    async fn list_tools(&self) -> McpSessionResult<Vec<DiscoveredTool>> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_DISCOVERY_PAGES {
            let params = cursor.as_ref().map(|next| json!({"cursor": next}));
            let raw = self.transport.request("tools/list", params).await?;
            let page: ToolListPage = serde_json::from_value(raw)
                .map_err(|err| McpSessionError::Protocol(format!("malformed tools/list: {err}")))?;
            tools.extend(page.tools.into_iter().map(DiscoveredTool::from));

            match page.next_cursor.filter(|next| !next.is_empty()) {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => return Ok(tools),
            }
        }

        Err(McpSessionError::Protocol(format!(
            "server '{}' paginated tools/list beyond {MAX_DISCOVERY_PAGES} pages",
            self.server
        )))
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> McpSessionResult<Value> {
        let params = json!({"name": name, "arguments": arguments});
        let result = self.transport.request("tools/call", Some(params)).await?;
        if result.get("isError").and_then(Value::as_bool) == Some(true) {
            return Err(McpSessionError::ToolFailed(error_text(&result)));
        }
        Ok(result)
    }

    async fn close(&self) -> McpSessionResult<()> {
        self.transport.shutdown().await
    }
}

/// Joins the text content of a failed tool result.
fn error_text(result: &Value) -> String {
    let text: Vec<&str> = result
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        result.to_string()
    } else {
        text.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted transport answering requests from a queue.
    #[derive(Default)]
    struct ScriptedTransport {
        answers: Mutex<VecDeque<McpSessionResult<Value>>>,
        sent: Mutex<Vec<(String, Option<Value>)>>,
    }

    impl ScriptedTransport {
        fn with_answers(answers: impl IntoIterator<Item = McpSessionResult<Value>>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().collect()),
                sent: Mutex::default(),
            }
        }

        fn sent(&self) -> Vec<(String, Option<Value>)> {
            self.sent.lock().expect("sent lock").clone()
        }
    }

    #[async_trait]
    impl RpcTransport for ScriptedTransport {
        async fn request(&self, method: &str, params: Option<Value>) -> McpSessionResult<Value> {
            self.sent
                .lock()
                .expect("sent lock")
                .push((method.to_owned(), params));
            self.answers
                .lock()
                .expect("answers lock")
                .pop_front()
                .unwrap_or(Err(McpSessionError::Closed))
        }

        async fn notify(&self, method: &str, params: Option<Value>) -> McpSessionResult<()> {
            self.sent
                .lock()
                .expect("sent lock")
                .push((method.to_owned(), params));
            Ok(())
        }

        async fn shutdown(&self) -> McpSessionResult<()> {
            Ok(())
        }
    }

    async fn initialized(
        answers: impl IntoIterator<Item = McpSessionResult<Value>>,
    ) -> ProtocolSession<ScriptedTransport> {
        let transport = ScriptedTransport::with_answers(
            std::iter::once(Ok(json!({"protocolVersion": PROTOCOL_VERSION}))).chain(answers),
        );
        ProtocolSession::initialize("fs", transport)
            .await
            .expect("handshake should succeed")
    }

    #[tokio::test]
    async fn handshake_sends_initialize_then_initialized() {
        let session = initialized([]).await;
        let sent = session.transport().sent();
        let methods: Vec<&str> = sent.iter().map(|(method, _)| method.as_str()).collect();
        assert_eq!(methods, ["initialize", "notifications/initialized"]);

        let params = sent
            .first()
            .and_then(|(_, params)| params.clone())
            .expect("initialize should carry params");
        assert_eq!(params["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(params["clientInfo"]["name"], "switchboard");
    }

    #[tokio::test]
    async fn handshake_rejects_non_object_answer() {
        let transport = ScriptedTransport::with_answers([Ok(json!("nope"))]);
        let result = ProtocolSession::initialize("fs", transport).await;
        assert!(matches!(result, Err(McpSessionError::Protocol(_))));
    }

    #[tokio::test]
    async fn list_tools_follows_cursor() {
        let session = initialized([
            Ok(json!({
                "tools": [{"name": "read_file", "description": "Read", "inputSchema": {"required": ["path"]}}],
                "nextCursor": "page-2"
            })),
            Ok(json!({"tools": [{"name": "list_dir"}]})),
        ])
        .await;

        let tools = session.list_tools().await.expect("discovery should succeed");

        let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_str()).collect();
        assert_eq!(names, ["read_file", "list_dir"]);
        let list_dir = tools.last().expect("second tool should exist");
        assert_eq!(list_dir.description, "");
        assert_eq!(list_dir.input_schema, json!({}));

        let sent = session.transport().sent();
        let second_page = sent.last().and_then(|(_, params)| params.clone());
        assert_eq!(second_page, Some(json!({"cursor": "page-2"})));
    }

    #[tokio::test]
    async fn flagged_tool_result_becomes_tool_failed() {
        let session = initialized([Ok(json!({
            "isError": true,
            "content": [{"type": "text", "text": "permission denied"}]
        }))])
        .await;

        let error = session
            .call_tool("read_file", Map::new())
            .await
            .expect_err("flagged result should fail");
        assert!(matches!(error, McpSessionError::ToolFailed(ref text) if text == "permission denied"));
    }

    #[tokio::test]
    async fn successful_tool_result_is_returned_verbatim() {
        let payload = json!({"content": [{"type": "text", "text": "hello"}], "isError": false});
        let session = initialized([Ok(payload.clone())]).await;

        let mut arguments = Map::new();
        arguments.insert("path".to_owned(), json!("/tmp/a"));
        let result = session
            .call_tool("read_file", arguments)
            .await
            .expect("call should succeed");

        assert_eq!(result, payload);
        let sent = session.transport().sent();
        let call = sent.last().and_then(|(_, params)| params.clone());
        assert_eq!(
            call,
            Some(json!({"name": "read_file", "arguments": {"path": "/tmp/a"}}))
        );
    }
}
