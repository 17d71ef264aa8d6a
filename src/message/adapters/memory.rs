//! In-memory message log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::agent::domain::AgentId;
use crate::message::{
    domain::AgentMessage,
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};

/// Thread-safe in-memory message log preserving send order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<Vec<AgentMessage>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: &AgentMessage) -> MessageRepositoryResult<()> {
        let mut messages = self.messages.write().map_err(|err| {
            MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if messages.iter().any(|stored| stored.id() == message.id()) {
            return Err(MessageRepositoryError::DuplicateMessage(message.id()));
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn list_all(&self) -> MessageRepositoryResult<Vec<AgentMessage>> {
        let messages = self.messages.read().map_err(|err| {
            MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(messages.clone())
    }

    async fn list_involving(&self, agent_id: &AgentId) -> MessageRepositoryResult<Vec<AgentMessage>> {
        let messages = self.messages.read().map_err(|err| {
            MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(messages
            .iter()
            .filter(|message| message.involves(agent_id))
            .cloned()
            .collect())
    }
}
