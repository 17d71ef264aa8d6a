//! Repository port for the agent message log.

use crate::agent::domain::AgentId;
use crate::message::domain::{AgentMessage, MessageId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Append-only message storage.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a message to the log.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::DuplicateMessage`] when the message
    /// ID already exists.
    async fn append(&self, message: &AgentMessage) -> MessageRepositoryResult<()>;

    /// Returns every message in send order.
    async fn list_all(&self) -> MessageRepositoryResult<Vec<AgentMessage>>;

    /// Returns the messages `agent_id` sent or received, in send order.
    async fn list_involving(&self, agent_id: &AgentId) -> MessageRepositoryResult<Vec<AgentMessage>>;
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
