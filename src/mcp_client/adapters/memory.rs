//! Scriptable in-memory connector for tests and local development.

use crate::mcp_client::ports::{
    DiscoveredTool, McpConnector, McpSession, McpSessionError, McpSessionResult,
};
use crate::tool_registry::domain::ServerDescriptor;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// A tool call observed by an in-memory session.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Server the call was routed to.
    pub server: String,
    /// Tool name.
    pub tool: String,
    /// Arguments as received.
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Default)]
struct ConnectorState {
    catalogs: HashMap<String, Vec<DiscoveredTool>>,
    outcomes: HashMap<(String, String), McpSessionResult<Value>>,
    connect_failures: HashMap<String, McpSessionError>,
    discovery_failures: HashMap<String, McpSessionError>,
    connect_delay: Option<Duration>,
    call_delay: Option<Duration>,
    connect_counts: HashMap<String, usize>,
    close_counts: HashMap<String, usize>,
    calls: Vec<RecordedCall>,
}

/// Connector whose servers are scripted in memory.
///
/// Clones share state, so a test can keep a handle for inspection after
/// handing the connector to a service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMcpConnector {
    state: Arc<RwLock<ConnectorState>>,
}

impl InMemoryMcpConnector {
    /// Creates a connector where every server advertises no tools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ConnectorState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConnectorState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the catalog `server` advertises.
    #[must_use]
    pub fn with_tools(self, server: &str, tools: impl IntoIterator<Item = DiscoveredTool>) -> Self {
        self.write()
            .catalogs
            .insert(server.to_owned(), tools.into_iter().collect());
        self
    }

    /// Sets the result returned when `server:tool` is called.
    #[must_use]
    pub fn with_tool_result(self, server: &str, tool: &str, result: Value) -> Self {
        self.write()
            .outcomes
            .insert((server.to_owned(), tool.to_owned()), Ok(result));
        self
    }

    /// Makes calls to `server:tool` fail with `error`.
    #[must_use]
    pub fn with_tool_error(self, server: &str, tool: &str, error: McpSessionError) -> Self {
        self.write()
            .outcomes
            .insert((server.to_owned(), tool.to_owned()), Err(error));
        self
    }

    /// Makes opening a session with `server` fail.
    #[must_use]
    pub fn with_connect_failure(self, server: &str, error: McpSessionError) -> Self {
        self.write()
            .connect_failures
            .insert(server.to_owned(), error);
        self
    }

    /// Makes tool discovery on `server` fail after the session opens.
    #[must_use]
    pub fn with_discovery_failure(self, server: &str, error: McpSessionError) -> Self {
        self.write()
            .discovery_failures
            .insert(server.to_owned(), error);
        self
    }

    /// Delays every session open.
    #[must_use]
    pub fn with_connect_delay(self, delay: Duration) -> Self {
        self.write().connect_delay = Some(delay);
        self
    }

    /// Delays every tool call.
    #[must_use]
    pub fn with_call_delay(self, delay: Duration) -> Self {
        self.write().call_delay = Some(delay);
        self
    }

    /// Returns how many sessions were opened with `server`.
    #[must_use]
    pub fn connect_count(&self, server: &str) -> usize {
        self.read().connect_counts.get(server).copied().unwrap_or(0)
    }

    /// Returns how many sessions with `server` were closed.
    #[must_use]
    pub fn close_count(&self, server: &str) -> usize {
        self.read().close_counts.get(server).copied().unwrap_or(0)
    }

    /// Returns every tool call observed so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.read().calls.clone()
    }
}

#[async_trait]
impl McpConnector for InMemoryMcpConnector {
    type Session = InMemorySession;

    async fn connect(&self, server: &ServerDescriptor) -> McpSessionResult<Self::Session> {
        let name = server.name().as_str().to_owned();
        let delay = {
            let mut state = self.write();
            *state.connect_counts.entry(name.clone()).or_default() += 1;
            state.connect_delay
        };
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        if let Some(error) = self.read().connect_failures.get(&name) {
            return Err(error.clone());
        }

        Ok(InMemorySession {
            server: name,
            connector: self.clone(),
        })
    }
}

/// Session handed out by [`InMemoryMcpConnector`].
#[derive(Debug, Clone)]
pub struct InMemorySession {
    server: String,
    connector: InMemoryMcpConnector,
}

#[async_trait]
impl McpSession for InMemorySession {
    async fn list_tools(&self) -> McpSessionResult<Vec<DiscoveredTool>> {
        let state = self.connector.read();
        if let Some(error) = state.discovery_failures.get(&self.server) {
            return Err(error.clone());
        }
        Ok(state.catalogs.get(&self.server).cloned().unwrap_or_default())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> McpSessionResult<Value> {
        let delay = {
            let mut state = self.connector.write();
            state.calls.push(RecordedCall {
                server: self.server.clone(),
                tool: name.to_owned(),
                arguments: arguments.clone(),
            });
            state.call_delay
        };
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }

        let scripted = self
            .connector
            .read()
            .outcomes
            .get(&(self.server.clone(), name.to_owned()))
            .cloned();
        scripted.unwrap_or_else(|| {
            Ok(json!({
                "content": [{"type": "text", "text": format!("{name} completed")}],
                "arguments": arguments,
            }))
        })
    }

    async fn close(&self) -> McpSessionResult<()> {
        *self
            .connector
            .write()
            .close_counts
            .entry(self.server.clone())
            .or_default() += 1;
        Ok(())
    }
}
