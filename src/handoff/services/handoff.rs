//! Handoff service: creation, responses, and plan progression.

use crate::agent::ports::AgentRoster;
use crate::agent::services::{AgentRegistry, AgentRegistryError};
use crate::error::{Classify, ErrorClass};
use crate::handoff::{
    domain::{
        Handoff, HandoffDomainError, HandoffId, HandoffParams, HandoffPlan, HandoffStep, PlanId,
        PlanProgress, WorkflowKind,
    },
    ports::{HandoffRepository, HandoffRepositoryError},
};
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for handoff operations.
#[derive(Debug, Error)]
pub enum HandoffServiceError {
    /// Domain validation or a transition failed.
    #[error(transparent)]
    Domain(#[from] HandoffDomainError),
    /// Roster lookup failed.
    #[error(transparent)]
    Agents(#[from] AgentRegistryError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] HandoffRepositoryError),
    /// No handoff has the requested identifier.
    #[error("Handoff '{0}' not found")]
    NotFound(HandoffId),
    /// No plan has the requested identifier.
    #[error("Handoff plan '{0}' not found")]
    PlanNotFound(PlanId),
}

impl Classify for HandoffServiceError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Domain(
                HandoffDomainError::InvalidStateTransition { .. }
                | HandoffDomainError::PlanFinished(_),
            )
            | Self::Repository(
                HandoffRepositoryError::Conflict { .. } | HandoffRepositoryError::PlanConflict { .. },
            ) => ErrorClass::InvalidStateTransition,
            Self::Domain(_) => ErrorClass::Validation,
            Self::Agents(err) => err.classify(),
            Self::NotFound(_)
            | Self::PlanNotFound(_)
            | Self::Repository(
                HandoffRepositoryError::NotFound(_) | HandoffRepositoryError::PlanNotFound(_),
            ) => ErrorClass::NotFound,
            Self::Repository(_) => ErrorClass::Internal,
        }
    }
}

/// Result type for handoff service operations.
pub type HandoffServiceResult<T> = Result<T, HandoffServiceError>;

/// Request to hand work from one agent to another.
#[derive(Debug, Clone, Default)]
pub struct CreateHandoff {
    /// Source agent identifier.
    pub from_agent: String,
    /// Target agent identifier.
    pub to_agent: String,
    /// Payload for the target agent.
    pub data: Value,
    /// Optional guidance for the target agent.
    pub instructions: Option<String>,
}

/// Coordinates handoffs between roster agents.
///
/// Both agents must exist; their roles are recorded on the handoff. A
/// handoff is answered exactly once: accepting or rejecting an answered
/// handoff fails as an invalid state transition.
#[derive(Clone)]
pub struct HandoffService<H, A, C>
where
    H: HandoffRepository,
    A: AgentRoster,
    C: Clock + Send + Sync,
{
    repository: Arc<H>,
    agents: AgentRegistry<A>,
    clock: Arc<C>,
}

impl<H, A, C> HandoffService<H, A, C>
where
    H: HandoffRepository,
    A: AgentRoster,
    C: Clock + Send + Sync,
{
    /// Creates a handoff service over `repository` and `roster`.
    #[must_use]
    pub const fn new(repository: Arc<H>, roster: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            repository,
            agents: AgentRegistry::new(roster),
            clock,
        }
    }

    /// Records a pending handoff.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when either agent does not exist and a
    /// validation error when an agent would hand off to itself.
    pub async fn create(&self, request: CreateHandoff) -> HandoffServiceResult<Handoff> {
        let source = self.agents.require(&request.from_agent).await?;
        let target = self.agents.require(&request.to_agent).await?;
        let handoff = Handoff::new(
            HandoffParams {
                from_agent: source.id().clone(),
                from_role: source.role().to_owned(),
                to_agent: target.id().clone(),
                to_role: target.role().to_owned(),
                data: request.data,
                instructions: request.instructions,
            },
            &*self.clock,
        )?;
        self.repository.store(&handoff).await?;
        info!(
            handoff_id = %handoff.id(),
            from = %handoff.from_agent(),
            to = %handoff.to_agent(),
            "handoff created"
        );
        Ok(handoff)
    }

    /// Finds a handoff by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffServiceError::Repository`] when lookup fails.
    pub async fn find(&self, id: HandoffId) -> HandoffServiceResult<Option<Handoff>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Accepts a pending handoff.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffServiceError::NotFound`] for unknown handoffs and an
    /// invalid-transition error unless the handoff is pending.
    pub async fn accept(&self, id: HandoffId) -> HandoffServiceResult<Handoff> {
        self.respond(id, |handoff, clock| handoff.accept(clock)).await
    }

    /// Rejects a pending handoff.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffServiceError::NotFound`] for unknown handoffs and an
    /// invalid-transition error unless the handoff is pending.
    pub async fn reject(&self, id: HandoffId) -> HandoffServiceResult<Handoff> {
        self.respond(id, |handoff, clock| handoff.reject(clock)).await
    }

    /// Returns the pending handoffs addressed to `agent_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the agent does not exist.
    pub async fn pending_for_agent(&self, agent_id: &str) -> HandoffServiceResult<Vec<Handoff>> {
        let agent = self.agents.require(agent_id).await?;
        Ok(self.repository.list_pending_for(agent.id()).await?)
    }

    /// Stores a plan positioned at its first step.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the plan has no steps or a step is
    /// incomplete.
    pub async fn create_plan(
        &self,
        steps: Vec<HandoffStep>,
        context: Map<String, Value>,
    ) -> HandoffServiceResult<HandoffPlan> {
        let plan = HandoffPlan::new(steps, context, &*self.clock)?;
        self.repository.store_plan(&plan).await?;
        debug!(plan_id = %plan.id(), steps = plan.steps().len(), "handoff plan created");
        Ok(plan)
    }

    /// Stores a plan built from the template matching `description`.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffServiceError::Repository`] when storage fails.
    pub async fn plan_for_task(
        &self,
        description: &str,
        context: Map<String, Value>,
    ) -> HandoffServiceResult<HandoffPlan> {
        let kind = WorkflowKind::recommend(description);
        debug!(workflow = ?kind, "recommended workflow");
        self.create_plan(kind.steps(), context).await
    }

    /// Finds a plan by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffServiceError::Repository`] when lookup fails.
    pub async fn find_plan(&self, id: PlanId) -> HandoffServiceResult<Option<HandoffPlan>> {
        Ok(self.repository.find_plan(id).await?)
    }

    /// Records `output` for the plan's current step and moves it on.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffServiceError::PlanNotFound`] for unknown plans and an
    /// invalid-transition error when the plan is already complete or another
    /// caller advanced it first.
    pub async fn advance_plan(
        &self,
        id: PlanId,
        output: Value,
    ) -> HandoffServiceResult<(HandoffPlan, PlanProgress)> {
        let mut plan = self
            .repository
            .find_plan(id)
            .await?
            .ok_or(HandoffServiceError::PlanNotFound(id))?;
        let expected_step = plan.current_step();
        let progress = plan.advance(output)?;
        self.repository.replace_plan(&plan, expected_step).await?;
        debug!(
            plan_id = %id,
            step = plan.current_step(),
            completed = progress.completed,
            "handoff plan advanced"
        );
        Ok((plan, progress))
    }

    async fn respond<F>(&self, id: HandoffId, change: F) -> HandoffServiceResult<Handoff>
    where
        F: FnOnce(&mut Handoff, &C) -> Result<(), HandoffDomainError> + Send,
    {
        let mut handoff = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(HandoffServiceError::NotFound(id))?;
        let previous = handoff.status();
        if let Err(err) = change(&mut handoff, &*self.clock) {
            warn!(handoff_id = %id, error = %err, "rejected handoff response");
            return Err(err.into());
        }

        match self.repository.replace(&handoff, previous).await {
            Ok(()) => {
                info!(handoff_id = %id, status = %handoff.status(), "handoff answered");
                Ok(handoff)
            }
            Err(HandoffRepositoryError::Conflict { actual, .. }) => {
                let err = HandoffDomainError::InvalidStateTransition {
                    handoff_id: id,
                    from: actual,
                    to: handoff.status(),
                };
                warn!(handoff_id = %id, error = %err, "lost handoff response race");
                Err(err.into())
            }
            Err(other) => Err(other.into()),
        }
    }
}
