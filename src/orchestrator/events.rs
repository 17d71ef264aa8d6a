//! Lifecycle events published by the orchestrator.

use crate::agent::domain::{AgentId, AgentStatus};
use crate::message::domain::AgentMessage;
use crate::task::domain::Task;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// Number of events a slow subscriber may fall behind before it lags.
pub const EVENT_CAPACITY: usize = 256;

/// Something that happened to a task, an agent, or the message log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum OrchestratorEvent {
    /// A task was recorded for an agent.
    #[serde(rename = "task:assigned")]
    TaskAssigned {
        /// The new pending task.
        task: Task,
    },
    /// A task finished with a result.
    #[serde(rename = "task:completed")]
    TaskCompleted {
        /// The completed task.
        task: Task,
    },
    /// A task finished with an error.
    #[serde(rename = "task:failed")]
    TaskFailed {
        /// The failed task, carrying the error message.
        task: Task,
    },
    /// An agent's availability changed.
    #[serde(rename = "agent:status-changed", rename_all = "camelCase")]
    AgentStatusChanged {
        /// Agent whose status changed.
        agent_id: AgentId,
        /// The new status.
        status: AgentStatus,
    },
    /// One agent messaged another.
    #[serde(rename = "message:sent")]
    MessageSent {
        /// The stored message.
        message: AgentMessage,
    },
}

impl OrchestratorEvent {
    /// Returns the event's wire name, e.g. `task:assigned`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TaskAssigned { .. } => "task:assigned",
            Self::TaskCompleted { .. } => "task:completed",
            Self::TaskFailed { .. } => "task:failed",
            Self::AgentStatusChanged { .. } => "agent:status-changed",
            Self::MessageSent { .. } => "message:sent",
        }
    }
}

/// Fan-out of orchestrator events to any number of subscribers.
///
/// Subscribing is `on`; dropping the receiver is `off`. Events published
/// while nobody listens are discarded.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<OrchestratorEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub(crate) fn publish(&self, event: OrchestratorEvent) {
        let name = event.name();
        if self.sender.send(event).is_err() {
            trace!(event = name, "no event subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CAPACITY)
    }
}
