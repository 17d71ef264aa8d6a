//! Roster queries and role resolution.

use crate::agent::{
    domain::{Agent, AgentDomainError, AgentId, AgentStatus},
    ports::{AgentRoster, AgentRosterError},
};
use crate::error::{Classify, ErrorClass};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for roster operations.
#[derive(Debug, Error)]
pub enum AgentRegistryError {
    /// The supplied agent id is malformed.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),

    /// Roster storage failed.
    #[error(transparent)]
    Repository(#[from] AgentRosterError),

    /// No agent has the requested id.
    #[error("Agent '{0}' not found")]
    AgentNotFound(String),

    /// No agent has the requested role.
    #[error("No agent available for role '{0}'")]
    NoAgentForRole(String),
}

impl Classify for AgentRegistryError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Domain(_) => ErrorClass::Validation,
            Self::Repository(AgentRosterError::NotFound(_))
            | Self::AgentNotFound(_)
            | Self::NoAgentForRole(_) => ErrorClass::NotFound,
            Self::Repository(_) => ErrorClass::Internal,
        }
    }
}

/// Result type for roster service operations.
pub type AgentRegistryResult<T> = Result<T, AgentRegistryError>;

/// Read access to the roster plus orchestrator-only status updates.
#[derive(Clone)]
pub struct AgentRegistry<R>
where
    R: AgentRoster,
{
    roster: Arc<R>,
}

impl<R> AgentRegistry<R>
where
    R: AgentRoster,
{
    /// Creates a registry service over `roster`.
    #[must_use]
    pub const fn new(roster: Arc<R>) -> Self {
        Self { roster }
    }

    /// Returns every agent in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::Repository`] when the roster fails.
    pub async fn list_all(&self) -> AgentRegistryResult<Vec<Agent>> {
        Ok(self.roster.list_all().await?)
    }

    /// Returns agents with exactly `role`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::Repository`] when the roster fails.
    pub async fn find_by_role(&self, role: &str) -> AgentRegistryResult<Vec<Agent>> {
        Ok(self.roster.find_by_role(role).await?)
    }

    /// Finds an agent by raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::Domain`] when `raw_id` is malformed.
    pub async fn find_by_id(&self, raw_id: &str) -> AgentRegistryResult<Option<Agent>> {
        let id = AgentId::new(raw_id)?;
        Ok(self.roster.find_by_id(&id).await?)
    }

    /// Returns the agent with `raw_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::AgentNotFound`] when it does not exist.
    pub async fn require(&self, raw_id: &str) -> AgentRegistryResult<Agent> {
        self.find_by_id(raw_id)
            .await
            .map_err(|err| match err {
                AgentRegistryError::Domain(_) => AgentRegistryError::AgentNotFound(raw_id.to_owned()),
                other => other,
            })?
            .ok_or_else(|| AgentRegistryError::AgentNotFound(raw_id.to_owned()))
    }

    /// Resolves `role` to the first matching agent in roster order.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::NoAgentForRole`] when no agent has the
    /// role.
    pub async fn resolve_role(&self, role: &str) -> AgentRegistryResult<Agent> {
        self.find_by_role(role)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AgentRegistryError::NoAgentForRole(role.to_owned()))
    }

    /// Updates an agent's status.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryError::Repository`] when the agent does not
    /// exist or the roster fails.
    pub async fn set_status(&self, id: &AgentId, status: AgentStatus) -> AgentRegistryResult<()> {
        Ok(self.roster.set_status(id, status).await?)
    }
}
