//! Validated agent identifier.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_ID_LENGTH: usize = 100;

/// Unique identifier of a roster agent (e.g. `agent-planner`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(String);

impl AgentId {
    /// Creates a validated agent identifier.
    ///
    /// The input is trimmed. Whitespace and colons are rejected so ids stay
    /// usable in logs and query strings.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentId`],
    /// [`AgentDomainError::AgentIdTooLong`], or
    /// [`AgentDomainError::InvalidAgentId`].
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(AgentDomainError::EmptyAgentId);
        }
        if trimmed.chars().count() > MAX_ID_LENGTH {
            return Err(AgentDomainError::AgentIdTooLong(raw));
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(AgentDomainError::InvalidAgentId(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AgentId {
    type Error = AgentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentId> for String {
    fn from(value: AgentId) -> Self {
        value.0
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
