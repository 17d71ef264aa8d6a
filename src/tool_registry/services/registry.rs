//! Lookup service over configured tool-server descriptors.

use crate::error::{Classify, ErrorClass};
use crate::tool_registry::{
    domain::{McpServerName, ServerDescriptor, ToolRegistryDomainError, validate_server_config},
    ports::{ServerRegistryError, ServerRegistryRepository},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for tool registry lookups.
#[derive(Debug, Error)]
pub enum ToolRegistryServiceError {
    /// The requested name is not a well-formed server name.
    #[error(transparent)]
    Domain(#[from] ToolRegistryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ServerRegistryError),
    /// No server is configured under the name.
    #[error("MCP server '{0}' not found")]
    UnknownServer(String),
    /// The descriptor failed pre-connection validation.
    #[error("Invalid server configuration for '{server}'")]
    InvalidServerConfig {
        /// Server name.
        server: McpServerName,
        /// Problems reported by validation.
        errors: Vec<String>,
    },
}

impl Classify for ToolRegistryServiceError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Domain(_) | Self::InvalidServerConfig { .. } => ErrorClass::Validation,
            Self::UnknownServer(_) => ErrorClass::NotFound,
            Self::Repository(_) => ErrorClass::Internal,
        }
    }
}

/// Result type for tool registry service operations.
pub type ToolRegistryServiceResult<T> = Result<T, ToolRegistryServiceError>;

/// Read-only view of the configured tool servers.
#[derive(Clone)]
pub struct ToolRegistry<R>
where
    R: ServerRegistryRepository,
{
    repository: Arc<R>,
}

impl<R> ToolRegistry<R>
where
    R: ServerRegistryRepository,
{
    /// Creates a registry service over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Finds a server descriptor by name.
    ///
    /// A name that could never be registered yields `None`.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the repository.
    pub async fn get_server_by_name(
        &self,
        server_name: &str,
    ) -> ToolRegistryServiceResult<Option<ServerDescriptor>> {
        let Ok(validated_name) = McpServerName::new(server_name) else {
            return Ok(None);
        };
        Ok(self.repository.find_by_name(&validated_name).await?)
    }

    /// Lists every configured server in configuration order.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the repository.
    pub async fn list_servers(&self) -> ToolRegistryServiceResult<Vec<ServerDescriptor>> {
        Ok(self.repository.list_all().await?)
    }

    /// Looks up a server and validates it for connection.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryServiceError::UnknownServer`] when no server has
    /// the name and [`ToolRegistryServiceError::InvalidServerConfig`] when
    /// validation reports problems.
    pub async fn resolve_for_connect(
        &self,
        server_name: &str,
    ) -> ToolRegistryServiceResult<ServerDescriptor> {
        let descriptor = self
            .get_server_by_name(server_name)
            .await?
            .ok_or_else(|| ToolRegistryServiceError::UnknownServer(server_name.to_owned()))?;

        let validation = validate_server_config(&descriptor);
        if !validation.is_valid() {
            return Err(ToolRegistryServiceError::InvalidServerConfig {
                server: descriptor.name().clone(),
                errors: validation.into_errors(),
            });
        }

        Ok(descriptor)
    }
}
