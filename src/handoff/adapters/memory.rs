//! In-memory handoff and plan store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::agent::domain::AgentId;
use crate::handoff::{
    domain::{Handoff, HandoffId, HandoffPlan, HandoffStatus, PlanId},
    ports::{HandoffRepository, HandoffRepositoryError, HandoffRepositoryResult},
};

/// Thread-safe in-memory handoff store preserving creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHandoffRepository {
    state: Arc<RwLock<InMemoryHandoffState>>,
}

#[derive(Debug, Default)]
struct InMemoryHandoffState {
    handoffs: HashMap<HandoffId, Handoff>,
    creation_order: Vec<HandoffId>,
    plans: HashMap<PlanId, HandoffPlan>,
}

fn poisoned<T>(err: &PoisonError<T>) -> HandoffRepositoryError {
    HandoffRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryHandoffRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> HandoffRepositoryResult<RwLockReadGuard<'_, InMemoryHandoffState>> {
        self.state.read().map_err(|err| poisoned(&err))
    }

    fn write(&self) -> HandoffRepositoryResult<RwLockWriteGuard<'_, InMemoryHandoffState>> {
        self.state.write().map_err(|err| poisoned(&err))
    }
}

#[async_trait]
impl HandoffRepository for InMemoryHandoffRepository {
    async fn store(&self, handoff: &Handoff) -> HandoffRepositoryResult<()> {
        let mut state = self.write()?;
        if state.handoffs.contains_key(&handoff.id()) {
            return Err(HandoffRepositoryError::DuplicateHandoff(handoff.id()));
        }
        state.creation_order.push(handoff.id());
        state.handoffs.insert(handoff.id(), handoff.clone());
        Ok(())
    }

    async fn replace(
        &self,
        handoff: &Handoff,
        expected: HandoffStatus,
    ) -> HandoffRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .handoffs
            .get_mut(&handoff.id())
            .ok_or(HandoffRepositoryError::NotFound(handoff.id()))?;
        if stored.status() != expected {
            return Err(HandoffRepositoryError::Conflict {
                handoff_id: handoff.id(),
                expected,
                actual: stored.status(),
            });
        }
        *stored = handoff.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: HandoffId) -> HandoffRepositoryResult<Option<Handoff>> {
        Ok(self.read()?.handoffs.get(&id).cloned())
    }

    async fn list_pending_for(&self, agent_id: &AgentId) -> HandoffRepositoryResult<Vec<Handoff>> {
        let state = self.read()?;
        Ok(state
            .creation_order
            .iter()
            .filter_map(|id| state.handoffs.get(id))
            .filter(|handoff| {
                handoff.to_agent() == agent_id && handoff.status() == HandoffStatus::Pending
            })
            .cloned()
            .collect())
    }

    async fn store_plan(&self, plan: &HandoffPlan) -> HandoffRepositoryResult<()> {
        let mut state = self.write()?;
        if state.plans.contains_key(&plan.id()) {
            return Err(HandoffRepositoryError::DuplicatePlan(plan.id()));
        }
        state.plans.insert(plan.id(), plan.clone());
        Ok(())
    }

    async fn replace_plan(
        &self,
        plan: &HandoffPlan,
        expected_step: usize,
    ) -> HandoffRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .plans
            .get_mut(&plan.id())
            .ok_or(HandoffRepositoryError::PlanNotFound(plan.id()))?;
        if stored.current_step() != expected_step {
            return Err(HandoffRepositoryError::PlanConflict {
                plan_id: plan.id(),
                expected: expected_step,
                actual: stored.current_step(),
            });
        }
        *stored = plan.clone();
        Ok(())
    }

    async fn find_plan(&self, id: PlanId) -> HandoffRepositoryResult<Option<HandoffPlan>> {
        Ok(self.read()?.plans.get(&id).cloned())
    }
}
