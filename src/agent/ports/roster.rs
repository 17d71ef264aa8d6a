//! Roster port: read access to agents plus status updates.

use crate::agent::domain::{Agent, AgentId, AgentStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for roster operations.
pub type AgentRosterResult<T> = Result<T, AgentRosterError>;

/// Agent roster contract.
#[async_trait]
pub trait AgentRoster: Send + Sync {
    /// Returns every agent in registration order.
    async fn list_all(&self) -> AgentRosterResult<Vec<Agent>>;

    /// Finds an agent by identifier.
    ///
    /// Returns `None` when the agent does not exist.
    async fn find_by_id(&self, id: &AgentId) -> AgentRosterResult<Option<Agent>>;

    /// Returns agents whose role equals `role` exactly, in registration
    /// order.
    async fn find_by_role(&self, role: &str) -> AgentRosterResult<Vec<Agent>>;

    /// Updates an agent's status.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRosterError::NotFound`] when the agent does not exist.
    async fn set_status(&self, id: &AgentId, status: AgentStatus) -> AgentRosterResult<()>;
}

/// Errors returned by roster implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRosterError {
    /// Two agents share an identifier.
    #[error("duplicate agent id: {0}")]
    DuplicateAgent(AgentId),

    /// The agent was not found.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Storage failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRosterError {
    /// Wraps a storage failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
