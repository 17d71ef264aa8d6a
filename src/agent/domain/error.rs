//! Error types for agent domain validation.

use thiserror::Error;

/// Errors raised while constructing agent domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentDomainError {
    /// The agent identifier is empty after trimming.
    #[error("agent id must not be empty")]
    EmptyAgentId,

    /// The agent identifier exceeds the maximum length.
    #[error("agent id exceeds 100 characters: {0}")]
    AgentIdTooLong(String),

    /// The agent identifier contains whitespace or a colon.
    #[error("agent id contains invalid characters: '{0}'")]
    InvalidAgentId(String),

    /// The role is empty after trimming.
    #[error("agent '{0}' has an empty role")]
    EmptyRole(String),

    /// The display name is empty after trimming.
    #[error("agent '{0}' has an empty display name")]
    EmptyDisplayName(String),
}

/// Error returned when parsing an unknown agent status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);
