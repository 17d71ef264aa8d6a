//! Error types for handoff validation and transitions.

use super::{HandoffId, HandoffStatus, PlanId};
use thiserror::Error;

/// Errors returned while constructing or transitioning handoffs and plans.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandoffDomainError {
    /// Source and target are the same agent.
    #[error("agent '{0}' cannot hand off to itself")]
    SelfHandoff(String),

    /// The handoff identifier is not a UUID.
    #[error("invalid handoff id '{0}'")]
    InvalidHandoffId(String),

    /// The plan identifier is not a UUID.
    #[error("invalid plan id '{0}'")]
    InvalidPlanId(String),

    /// The handoff already has a response.
    #[error("handoff {handoff_id} cannot transition from {from} to {to}")]
    InvalidStateTransition {
        /// Handoff being transitioned.
        handoff_id: HandoffId,
        /// Current status.
        from: HandoffStatus,
        /// Requested status.
        to: HandoffStatus,
    },

    /// A plan needs at least one step.
    #[error("handoff plan must have at least one step")]
    EmptyPlan,

    /// A step names a blank role or action.
    #[error("handoff step {0} needs a source role, a target role, and an action")]
    IncompleteStep(usize),

    /// Every step of the plan has already run.
    #[error("handoff plan {0} is already complete")]
    PlanFinished(PlanId),
}
