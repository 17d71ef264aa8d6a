//! Transport port for MCP sessions.

use crate::tool_registry::domain::ServerDescriptor;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Result type for MCP session operations.
pub type McpSessionResult<T> = Result<T, McpSessionError>;

/// Tool metadata as advertised by a server during discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredTool {
    /// Tool name, unique within the server.
    pub name: String,
    /// Human-readable description; empty when the server omits it.
    pub description: String,
    /// Raw JSON input schema; an empty object when the server omits it.
    pub input_schema: Value,
}

impl DiscoveredTool {
    /// Creates a discovered tool.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Opens sessions with tool servers.
#[async_trait]
pub trait McpConnector: Send + Sync {
    /// Session type produced by this connector.
    type Session: McpSession + 'static;

    /// Opens a session and completes the protocol handshake.
    ///
    /// Dropping the returned future before it resolves must release any
    /// resources acquired so far.
    async fn connect(&self, server: &ServerDescriptor) -> McpSessionResult<Self::Session>;
}

/// A live, initialized session with one tool server.
///
/// Sessions are shared between concurrent callers; implementations must
/// support interleaved calls.
#[async_trait]
pub trait McpSession: Send + Sync {
    /// Lists every tool the server advertises, following pagination.
    async fn list_tools(&self) -> McpSessionResult<Vec<DiscoveredTool>>;

    /// Invokes a tool and returns the remote result verbatim.
    ///
    /// A result the server flags as an error is reported as
    /// [`McpSessionError::ToolFailed`].
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>)
    -> McpSessionResult<Value>;

    /// Ends the session and releases transport resources.
    async fn close(&self) -> McpSessionResult<()>;
}

/// Errors returned by MCP transport adapters.
#[derive(Debug, Clone, Error)]
pub enum McpSessionError {
    /// The transport could not be started.
    #[error("failed to start transport: {0}")]
    Spawn(Arc<dyn std::error::Error + Send + Sync>),

    /// Reading from or writing to the transport failed.
    #[error("transport I/O failed: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),

    /// The peer sent something that is not valid MCP.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The peer answered with a JSON-RPC error object.
    #[error("server returned error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message from the server.
        message: String,
    },

    /// The tool ran and reported failure.
    #[error("tool reported an error: {0}")]
    ToolFailed(String),

    /// The session has been closed or the peer went away.
    #[error("session closed")]
    Closed,
}

impl McpSessionError {
    /// Wraps a transport start-up failure.
    pub fn spawn(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Spawn(Arc::new(err))
    }

    /// Wraps a transport I/O failure.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
