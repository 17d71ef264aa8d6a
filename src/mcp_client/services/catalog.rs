//! Tool catalog aggregated across connected servers.

use crate::mcp_client::domain::ToolDescriptor;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Discovered tools keyed by server name.
///
/// Each server's tools are replaced as a unit, so readers never observe a
/// half-published catalog.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    servers: RwLock<BTreeMap<String, Arc<[ToolDescriptor]>>>,
}

impl ToolCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tools published for `server`.
    pub fn publish(&self, server: &str, tools: Vec<ToolDescriptor>) {
        self.servers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(server.to_owned(), tools.into());
    }

    /// Removes every tool belonging to `server`.
    pub fn discard(&self, server: &str) {
        self.servers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(server);
    }

    /// Returns all tools, grouped by server name in sorted order.
    #[must_use]
    pub fn list_all(&self) -> Vec<ToolDescriptor> {
        self.servers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flat_map(|tools| tools.iter().cloned())
            .collect()
    }

    /// Returns tools whose category equals `category`.
    #[must_use]
    pub fn list_by_category(&self, category: &str) -> Vec<ToolDescriptor> {
        self.servers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flat_map(|tools| tools.iter())
            .filter(|tool| tool.category() == category)
            .cloned()
            .collect()
    }

    /// Looks up `tool` on `server`.
    #[must_use]
    pub fn find(&self, server: &str, tool: &str) -> Option<ToolDescriptor> {
        self.servers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(server)
            .and_then(|tools| tools.iter().find(|candidate| candidate.name() == tool))
            .cloned()
    }

    /// Returns the number of tools published for `server`.
    #[must_use]
    pub fn tool_count(&self, server: &str) -> usize {
        self.servers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(server)
            .map_or(0, |tools| tools.len())
    }
}
