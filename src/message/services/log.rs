//! Message log service.

use crate::agent::domain::AgentId;
use crate::error::{Classify, ErrorClass};
use crate::message::{
    domain::{AgentMessage, MessageDomainError},
    ports::{MessageRepository, MessageRepositoryError},
};
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for the message log.
#[derive(Debug, Error)]
pub enum MessageLogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] MessageDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] MessageRepositoryError),
}

impl Classify for MessageLogError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Domain(_) => ErrorClass::Validation,
            Self::Repository(_) => ErrorClass::Internal,
        }
    }
}

/// Result type for message log operations.
pub type MessageLogResult<T> = Result<T, MessageLogError>;

/// Records and lists agent messages.
///
/// The log does not know the roster; callers check that both agents exist.
#[derive(Clone)]
pub struct MessageLog<R, C>
where
    R: MessageRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> MessageLog<R, C>
where
    R: MessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a message log over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Appends a message from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageLogError::Domain`] when the content is blank and
    /// [`MessageLogError::Repository`] when storage fails.
    pub async fn record(
        &self,
        from: AgentId,
        to: AgentId,
        content: impl Into<String> + Send,
        metadata: Map<String, Value>,
    ) -> MessageLogResult<AgentMessage> {
        let message = AgentMessage::new(from, to, content, metadata, &*self.clock)?;
        self.repository.append(&message).await?;
        debug!(
            message_id = %message.id(),
            from = %message.sender(),
            to = %message.recipient(),
            "stored message"
        );
        Ok(message)
    }

    /// Returns every message in send order.
    ///
    /// # Errors
    ///
    /// Returns [`MessageLogError::Repository`] when listing fails.
    pub async fn list_all(&self) -> MessageLogResult<Vec<AgentMessage>> {
        Ok(self.repository.list_all().await?)
    }

    /// Returns the messages `agent_id` sent or received.
    ///
    /// # Errors
    ///
    /// Returns [`MessageLogError::Repository`] when listing fails.
    pub async fn list_for_agent(&self, agent_id: &AgentId) -> MessageLogResult<Vec<AgentMessage>> {
        Ok(self.repository.list_involving(agent_id).await?)
    }
}
