//! In-memory registry of configured tool-server descriptors.

use crate::tool_registry::{
    domain::{McpServerName, ServerDescriptor},
    ports::{ServerRegistryError, ServerRegistryRepository, ServerRegistryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory server registry.
///
/// Descriptors are loaded once and never mutated; lookups preserve the
/// order in which descriptors were supplied.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServerRegistry {
    state: Arc<RwLock<InMemoryRegistryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    servers: Vec<ServerDescriptor>,
    name_index: HashMap<McpServerName, usize>,
}

impl InMemoryServerRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `descriptors`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryError::DuplicateServerName`] when two
    /// descriptors share a name.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ServerDescriptor>,
    ) -> ServerRegistryResult<Self> {
        let mut state = InMemoryRegistryState::default();
        for descriptor in descriptors {
            if state.name_index.contains_key(descriptor.name()) {
                return Err(ServerRegistryError::DuplicateServerName(
                    descriptor.name().clone(),
                ));
            }
            state
                .name_index
                .insert(descriptor.name().clone(), state.servers.len());
            state.servers.push(descriptor);
        }

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }
}

#[async_trait]
impl ServerRegistryRepository for InMemoryServerRegistry {
    async fn find_by_name(
        &self,
        server_name: &McpServerName,
    ) -> ServerRegistryResult<Option<ServerDescriptor>> {
        let state = self.state.read().map_err(|err| {
            ServerRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .name_index
            .get(server_name)
            .and_then(|position| state.servers.get(*position))
            .cloned())
    }

    async fn list_all(&self) -> ServerRegistryResult<Vec<ServerDescriptor>> {
        let state = self.state.read().map_err(|err| {
            ServerRegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.servers.clone())
    }
}
