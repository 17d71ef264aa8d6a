//! Error types for MCP client operations.

use super::PropertyKind;
use crate::error::{Classify, ErrorClass};
use crate::mcp_client::ports::McpSessionError;
use crate::security::ToolIdFormatError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for MCP client operations.
pub type McpClientResult<T> = Result<T, McpClientError>;

/// Errors returned by connection, catalog, and tool-call operations.
#[derive(Debug, Error)]
pub enum McpClientError {
    /// The tool identifier is not `server:tool`.
    #[error(transparent)]
    InvalidToolId(#[from] ToolIdFormatError),

    /// Demo mode blocks the operation.
    #[error("Operation '{tool_id}' is blocked in demo mode")]
    OperationBlocked {
        /// Requested tool identifier.
        tool_id: String,
    },

    /// No connected server advertises the tool.
    #[error("Tool '{tool_id}' not found")]
    ToolNotFound {
        /// Requested tool identifier.
        tool_id: String,
    },

    /// A required argument is absent.
    #[error("Missing required field '{field}' for tool '{tool_id}'")]
    MissingRequiredField {
        /// Requested tool identifier.
        tool_id: String,
        /// First missing field in declared order.
        field: String,
    },

    /// An argument does not have the declared kind.
    #[error("Field '{field}' for tool '{tool_id}' must be of type {expected}")]
    InvalidArgument {
        /// Requested tool identifier.
        tool_id: String,
        /// Offending field.
        field: String,
        /// Declared kind.
        expected: PropertyKind,
    },

    /// The server has no live session.
    #[error("Server '{server}' not connected")]
    NotConnected {
        /// Server name.
        server: String,
    },

    /// The remote server or transport reported a failure for a call.
    #[error("Tool call '{tool_id}' failed: {cause}")]
    RemoteError {
        /// Requested tool identifier.
        tool_id: String,
        /// Underlying session failure.
        #[source]
        cause: McpSessionError,
    },

    /// Opening a session or discovering its catalog failed.
    #[error("Failed to connect to '{server}': {cause}")]
    ConnectionFailed {
        /// Server name.
        server: String,
        /// Underlying session failure.
        #[source]
        cause: McpSessionError,
    },

    /// The caller's deadline elapsed.
    #[error("'{target}' timed out after {}ms", .after.as_millis())]
    Timeout {
        /// Server name or tool identifier.
        target: String,
        /// Configured limit.
        after: Duration,
    },

    /// The caller cancelled the operation.
    #[error("'{target}' was cancelled")]
    Cancelled {
        /// Server name or tool identifier.
        target: String,
    },

    /// Process-internal failure.
    #[error("internal MCP client error: {0}")]
    Internal(Arc<dyn std::error::Error + Send + Sync>),
}

impl McpClientError {
    /// Wraps a process-internal failure.
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl Classify for McpClientError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::InvalidToolId(_)
            | Self::MissingRequiredField { .. }
            | Self::InvalidArgument { .. } => ErrorClass::Validation,
            Self::OperationBlocked { .. } => ErrorClass::PolicyBlocked,
            Self::ToolNotFound { .. } => ErrorClass::NotFound,
            Self::NotConnected { .. } | Self::RemoteError { .. } | Self::ConnectionFailed { .. } => {
                ErrorClass::Connection
            }
            Self::Timeout { .. } | Self::Cancelled { .. } => ErrorClass::Timeout,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }
}
