//! Validated, policy-gated access to connected tool servers.

use super::catalog::ToolCatalog;
use super::connections::{ConnectAttempt, ConnectionManager};
use crate::deadline::Deadline;
use crate::mcp_client::domain::{
    ConnectOutcome, ConnectedServer, ConnectionState, McpClientError, McpClientResult,
    ToolDescriptor, ToolId,
};
use crate::mcp_client::ports::McpConnector;
use crate::security::{PresenceValidator, SchemaValidator, SecurityGate};
use crate::tool_registry::domain::ServerDescriptor;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Protocol client composing connections, the tool catalog, and the
/// security gate.
pub struct McpClient<C>
where
    C: McpConnector,
{
    connections: ConnectionManager<C>,
    catalog: Arc<ToolCatalog>,
    gate: SecurityGate,
    validator: Arc<dyn SchemaValidator>,
}

impl<C> McpClient<C>
where
    C: McpConnector,
{
    /// Creates a client validating arguments with [`PresenceValidator`].
    #[must_use]
    pub fn new(connector: Arc<C>, gate: SecurityGate) -> Self {
        let catalog = Arc::new(ToolCatalog::new());
        Self {
            connections: ConnectionManager::new(connector, Arc::clone(&catalog)),
            catalog,
            gate,
            validator: Arc::new(PresenceValidator),
        }
    }

    /// Replaces the argument validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Returns the security gate.
    #[must_use]
    pub const fn security_gate(&self) -> &SecurityGate {
        &self.gate
    }

    /// Connects to a server; see [`ConnectionManager::connect`].
    ///
    /// # Errors
    ///
    /// Propagates connection, timeout, and cancellation failures.
    pub async fn connect(
        &self,
        descriptor: &ServerDescriptor,
        deadline: &Deadline,
    ) -> McpClientResult<ConnectOutcome> {
        self.connections.connect(descriptor, deadline).await
    }

    /// Connects to every descriptor independently.
    pub async fn connect_all(
        &self,
        descriptors: &[ServerDescriptor],
        deadline: &Deadline,
    ) -> Vec<ConnectAttempt> {
        self.connections.connect_all(descriptors, deadline).await
    }

    /// Disconnects a server; returns whether it was connected.
    pub async fn disconnect(&self, server: &str) -> bool {
        self.connections.disconnect(server).await
    }

    /// Disconnects every server.
    pub async fn disconnect_all(&self) -> Vec<String> {
        let closed = self.connections.disconnect_all().await;
        info!(count = closed.len(), "disconnected all MCP servers");
        closed
    }

    /// Returns whether `server` has a live session.
    #[must_use]
    pub fn is_connected(&self, server: &str) -> bool {
        self.connections.is_connected(server)
    }

    /// Returns the connection state of `server`.
    #[must_use]
    pub fn connection_state(&self, server: &str) -> ConnectionState {
        self.connections.state(server)
    }

    /// Summarizes every connected server.
    #[must_use]
    pub fn connected_servers(&self) -> Vec<ConnectedServer> {
        self.connections.connected_servers()
    }

    /// Lists every discovered tool.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.catalog.list_all()
    }

    /// Lists discovered tools in `category`.
    #[must_use]
    pub fn list_tools_by_category(&self, category: &str) -> Vec<ToolDescriptor> {
        self.catalog.list_by_category(category)
    }

    /// Validates and invokes `tool_id` with `arguments`.
    ///
    /// Checks run in a fixed order, and each rejects before anything after
    /// it runs: identifier format, demo-mode blocklist, catalog lookup,
    /// argument schema, then dispatch. The remote result is returned
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns, in check order, [`McpClientError::InvalidToolId`],
    /// [`McpClientError::OperationBlocked`], [`McpClientError::ToolNotFound`],
    /// [`McpClientError::MissingRequiredField`] or
    /// [`McpClientError::InvalidArgument`], and then any dispatch failure
    /// from [`ConnectionManager::call`].
    pub async fn call_tool(
        &self,
        tool_id: &str,
        arguments: Map<String, Value>,
        deadline: &Deadline,
    ) -> McpClientResult<Value> {
        let target = ToolId::parse(tool_id)?;

        if self.gate.is_blocked(tool_id) {
            warn!(tool_id = %tool_id, "blocked tool call in demo mode");
            return Err(McpClientError::OperationBlocked {
                tool_id: tool_id.to_owned(),
            });
        }

        let tool = self
            .catalog
            .find(target.server(), target.tool())
            .ok_or_else(|| McpClientError::ToolNotFound {
                tool_id: tool_id.to_owned(),
            })?;

        let check = self.validator.check(tool.schema(), &arguments);
        if let Some(field) = check.missing_fields().first() {
            return Err(McpClientError::MissingRequiredField {
                tool_id: tool_id.to_owned(),
                field: field.clone(),
            });
        }
        if let Some((field, expected)) = check.mismatched_fields().first() {
            return Err(McpClientError::InvalidArgument {
                tool_id: tool_id.to_owned(),
                field: field.clone(),
                expected: *expected,
            });
        }

        self.connections
            .call(target.server(), target.tool(), tool_id, arguments, deadline)
            .await
    }
}
