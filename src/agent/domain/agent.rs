//! Roster agent aggregate.

use super::{AgentDomainError, AgentId, AgentStatus};
use serde::Serialize;

/// A named agent that tasks are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    id: AgentId,
    role: String,
    display_name: String,
    status: AgentStatus,
    description: String,
    capabilities: Vec<String>,
}

impl Agent {
    /// Creates an idle agent.
    ///
    /// Role and display name are trimmed. Roles are matched case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyRole`] or
    /// [`AgentDomainError::EmptyDisplayName`] when either is blank.
    pub fn new(
        id: AgentId,
        role: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, AgentDomainError> {
        let raw_role = role.into();
        let raw_display_name = display_name.into();
        if raw_role.trim().is_empty() {
            return Err(AgentDomainError::EmptyRole(id.into()));
        }
        if raw_display_name.trim().is_empty() {
            return Err(AgentDomainError::EmptyDisplayName(id.into()));
        }

        Ok(Self {
            id,
            role: raw_role.trim().to_owned(),
            display_name: raw_display_name.trim().to_owned(),
            status: AgentStatus::Idle,
            description: String::new(),
            capabilities: Vec::new(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the capability tags.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> &AgentId {
        &self.id
    }

    /// Returns the logical role.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the capability tags.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Updates the status.
    pub const fn set_status(&mut self, status: AgentStatus) {
        self.status = status;
    }
}
