//! Domain model for agent handoffs and handoff plans.

mod error;
mod handoff;
mod ids;
mod plan;
mod workflows;

pub use error::HandoffDomainError;
pub use handoff::{Handoff, HandoffParams, HandoffStatus};
pub use ids::{HandoffId, PlanId};
pub use plan::{HandoffPlan, HandoffStep, PlanProgress};
pub use workflows::WorkflowKind;
