//! Repository port for handoffs and handoff plans.

use crate::agent::domain::AgentId;
use crate::handoff::domain::{Handoff, HandoffId, HandoffPlan, HandoffStatus, PlanId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for handoff repository operations.
pub type HandoffRepositoryResult<T> = Result<T, HandoffRepositoryError>;

/// Handoff and plan persistence contract.
#[async_trait]
pub trait HandoffRepository: Send + Sync {
    /// Stores a new handoff.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffRepositoryError::DuplicateHandoff`] when the ID
    /// already exists.
    async fn store(&self, handoff: &Handoff) -> HandoffRepositoryResult<()>;

    /// Replaces a stored handoff, provided its stored status still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffRepositoryError::NotFound`] when the handoff does not
    /// exist and [`HandoffRepositoryError::Conflict`] when another writer
    /// responded first.
    async fn replace(&self, handoff: &Handoff, expected: HandoffStatus)
    -> HandoffRepositoryResult<()>;

    /// Finds a handoff by identifier.
    async fn find_by_id(&self, id: HandoffId) -> HandoffRepositoryResult<Option<Handoff>>;

    /// Returns pending handoffs addressed to `agent_id`, oldest first.
    async fn list_pending_for(&self, agent_id: &AgentId) -> HandoffRepositoryResult<Vec<Handoff>>;

    /// Stores a new plan.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffRepositoryError::DuplicatePlan`] when the ID already
    /// exists.
    async fn store_plan(&self, plan: &HandoffPlan) -> HandoffRepositoryResult<()>;

    /// Replaces a stored plan, provided it still sits at `expected_step`.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffRepositoryError::PlanNotFound`] when the plan does
    /// not exist and [`HandoffRepositoryError::PlanConflict`] when another
    /// writer advanced it first.
    async fn replace_plan(
        &self,
        plan: &HandoffPlan,
        expected_step: usize,
    ) -> HandoffRepositoryResult<()>;

    /// Finds a plan by identifier.
    async fn find_plan(&self, id: PlanId) -> HandoffRepositoryResult<Option<HandoffPlan>>;
}

/// Errors returned by handoff repository implementations.
#[derive(Debug, Clone, Error)]
pub enum HandoffRepositoryError {
    /// A handoff with the same identifier already exists.
    #[error("duplicate handoff identifier: {0}")]
    DuplicateHandoff(HandoffId),

    /// The handoff was not found.
    #[error("handoff not found: {0}")]
    NotFound(HandoffId),

    /// The stored status no longer matches the caller's expectation.
    #[error("handoff {handoff_id} is {actual}, expected {expected}")]
    Conflict {
        /// Handoff being replaced.
        handoff_id: HandoffId,
        /// Status the caller read.
        expected: HandoffStatus,
        /// Status currently stored.
        actual: HandoffStatus,
    },

    /// A plan with the same identifier already exists.
    #[error("duplicate plan identifier: {0}")]
    DuplicatePlan(PlanId),

    /// The plan was not found.
    #[error("plan not found: {0}")]
    PlanNotFound(PlanId),

    /// The plan moved past the step the caller read.
    #[error("plan {plan_id} is at step {actual}, expected {expected}")]
    PlanConflict {
        /// Plan being replaced.
        plan_id: PlanId,
        /// Step the caller read.
        expected: usize,
        /// Step currently stored.
        actual: usize,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl HandoffRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
