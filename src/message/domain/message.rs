//! Agent message record.

use super::{MessageDomainError, MessageId};
use crate::agent::domain::AgentId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use serde_json::{Map, Value};

/// A message one agent sent to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    id: MessageId,
    from: AgentId,
    to: AgentId,
    content: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
    sent_at: DateTime<Utc>,
}

impl AgentMessage {
    /// Creates a message stamped with the clock's current time.
    ///
    /// The content is kept verbatim; only its blankness is checked.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDomainError::EmptyContent`] when the content is
    /// blank.
    pub fn new(
        from: AgentId,
        to: AgentId,
        content: impl Into<String>,
        metadata: Map<String, Value>,
        clock: &impl Clock,
    ) -> Result<Self, MessageDomainError> {
        let body = content.into();
        if body.trim().is_empty() {
            return Err(MessageDomainError::EmptyContent);
        }

        Ok(Self {
            id: MessageId::new(),
            from,
            to,
            content: body,
            metadata,
            sent_at: clock.utc(),
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the sending agent.
    #[must_use]
    pub const fn sender(&self) -> &AgentId {
        &self.from
    }

    /// Returns the receiving agent.
    #[must_use]
    pub const fn recipient(&self) -> &AgentId {
        &self.to
    }

    /// Returns the message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns caller-supplied metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Returns when the message was sent.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Returns whether `agent_id` sent or received the message.
    #[must_use]
    pub fn involves(&self, agent_id: &AgentId) -> bool {
        &self.from == agent_id || &self.to == agent_id
    }
}
