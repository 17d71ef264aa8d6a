//! Repository port for tool-server descriptor lookup.

use crate::tool_registry::domain::{McpServerName, ServerDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for server registry operations.
pub type ServerRegistryResult<T> = Result<T, ServerRegistryError>;

/// Read contract for configured server descriptors.
#[async_trait]
pub trait ServerRegistryRepository: Send + Sync {
    /// Finds a descriptor by unique server name.
    async fn find_by_name(
        &self,
        server_name: &McpServerName,
    ) -> ServerRegistryResult<Option<ServerDescriptor>>;

    /// Returns every descriptor in configuration order.
    async fn list_all(&self) -> ServerRegistryResult<Vec<ServerDescriptor>>;
}

/// Errors returned by server registry implementations.
#[derive(Debug, Clone, Error)]
pub enum ServerRegistryError {
    /// Two descriptors share a name.
    #[error("duplicate MCP server name: {0}")]
    DuplicateServerName(McpServerName),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServerRegistryError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
