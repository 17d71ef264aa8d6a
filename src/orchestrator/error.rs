//! Orchestrator error type.

use crate::agent::services::AgentRegistryError;
use crate::error::{Classify, ErrorClass};
use crate::message::services::MessageLogError;
use crate::task::services::TaskLifecycleError;
use thiserror::Error;

/// Errors returned by orchestrator operations.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Roster lookup or update failed.
    #[error(transparent)]
    Agents(#[from] AgentRegistryError),
    /// Task storage or transition failed.
    #[error(transparent)]
    Tasks(#[from] TaskLifecycleError),
    /// Message storage or validation failed.
    #[error(transparent)]
    Messages(#[from] MessageLogError),
}

impl Classify for OrchestratorError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Agents(err) => err.classify(),
            Self::Tasks(err) => err.classify(),
            Self::Messages(err) => err.classify(),
        }
    }
}

/// Result type for orchestrator operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
