//! Handoff record and its response status.

use super::{HandoffDomainError, HandoffId};
use crate::agent::domain::AgentId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Response state of a handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStatus {
    /// Waiting for the target agent.
    Pending,
    /// The target agent took the work.
    Accepted,
    /// The target agent declined the work.
    Rejected,
}

impl HandoffStatus {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether the target agent has responded.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for HandoffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for creating a handoff.
///
/// Roles are copied from the roster so the record stays readable after the
/// fact.
#[derive(Debug, Clone)]
pub struct HandoffParams {
    /// Agent handing the work off.
    pub from_agent: AgentId,
    /// Role of the source agent.
    pub from_role: String,
    /// Agent receiving the work.
    pub to_agent: AgentId,
    /// Role of the target agent.
    pub to_role: String,
    /// Payload passed along with the work.
    pub data: Value,
    /// Optional guidance for the target agent.
    pub instructions: Option<String>,
}

/// Work passed from one agent to another.
///
/// # Examples
///
/// ```
/// use mockable::DefaultClock;
/// use serde_json::json;
/// use switchboard::agent::domain::AgentId;
/// use switchboard::handoff::domain::{Handoff, HandoffParams, HandoffStatus};
///
/// let params = HandoffParams {
///     from_agent: AgentId::new("agent-planner").unwrap(),
///     from_role: "planner".to_owned(),
///     to_agent: AgentId::new("agent-executor").unwrap(),
///     to_role: "executor".to_owned(),
///     data: json!({"plan": ["build", "test"]}),
///     instructions: None,
/// };
/// let mut handoff = Handoff::new(params, &DefaultClock).unwrap();
/// handoff.accept(&DefaultClock).unwrap();
/// assert_eq!(handoff.status(), HandoffStatus::Accepted);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Handoff {
    id: HandoffId,
    from_agent: AgentId,
    to_agent: AgentId,
    from_role: String,
    to_role: String,
    data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
    status: HandoffStatus,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    responded_at: Option<DateTime<Utc>>,
}

impl Handoff {
    /// Creates a pending handoff.
    ///
    /// Blank instructions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffDomainError::SelfHandoff`] when source and target are
    /// the same agent.
    pub fn new(params: HandoffParams, clock: &impl Clock) -> Result<Self, HandoffDomainError> {
        if params.from_agent == params.to_agent {
            return Err(HandoffDomainError::SelfHandoff(params.from_agent.into()));
        }

        Ok(Self {
            id: HandoffId::new(),
            from_agent: params.from_agent,
            to_agent: params.to_agent,
            from_role: params.from_role,
            to_role: params.to_role,
            data: params.data,
            instructions: params
                .instructions
                .filter(|text| !text.trim().is_empty()),
            status: HandoffStatus::Pending,
            created_at: clock.utc(),
            responded_at: None,
        })
    }

    /// Returns the handoff identifier.
    #[must_use]
    pub const fn id(&self) -> HandoffId {
        self.id
    }

    /// Returns the source agent.
    #[must_use]
    pub const fn from_agent(&self) -> &AgentId {
        &self.from_agent
    }

    /// Returns the target agent.
    #[must_use]
    pub const fn to_agent(&self) -> &AgentId {
        &self.to_agent
    }

    /// Returns the source agent's role.
    #[must_use]
    pub fn from_role(&self) -> &str {
        &self.from_role
    }

    /// Returns the target agent's role.
    #[must_use]
    pub fn to_role(&self) -> &str {
        &self.to_role
    }

    /// Returns the payload.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the instructions, if any.
    #[must_use]
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> HandoffStatus {
        self.status
    }

    /// Returns when the handoff was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the target agent responded.
    #[must_use]
    pub const fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    /// Records the target agent's acceptance.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffDomainError::InvalidStateTransition`] unless the
    /// handoff is pending.
    pub fn accept(&mut self, clock: &impl Clock) -> Result<(), HandoffDomainError> {
        self.respond(HandoffStatus::Accepted, clock)
    }

    /// Records the target agent's refusal.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffDomainError::InvalidStateTransition`] unless the
    /// handoff is pending.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), HandoffDomainError> {
        self.respond(HandoffStatus::Rejected, clock)
    }

    fn respond(&mut self, next: HandoffStatus, clock: &impl Clock) -> Result<(), HandoffDomainError> {
        if self.status.is_terminal() {
            return Err(HandoffDomainError::InvalidStateTransition {
                handoff_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.responded_at = Some(clock.utc());
        Ok(())
    }
}
