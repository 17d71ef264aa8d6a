//! In-memory agent roster.

use crate::agent::{
    domain::{Agent, AgentId, AgentStatus},
    ports::{AgentRoster, AgentRosterError, AgentRosterResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory roster preserving registration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRoster {
    state: Arc<RwLock<InMemoryRosterState>>,
}

#[derive(Debug, Default)]
struct InMemoryRosterState {
    agents: Vec<Agent>,
    id_index: HashMap<AgentId, usize>,
}

impl InMemoryAgentRoster {
    /// Creates a roster holding `agents`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRosterError::DuplicateAgent`] when two agents share an
    /// identifier.
    pub fn from_agents(agents: impl IntoIterator<Item = Agent>) -> AgentRosterResult<Self> {
        let mut state = InMemoryRosterState::default();
        for agent in agents {
            if state.id_index.contains_key(agent.id()) {
                return Err(AgentRosterError::DuplicateAgent(agent.id().clone()));
            }
            state.id_index.insert(agent.id().clone(), state.agents.len());
            state.agents.push(agent);
        }

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }
}

#[async_trait]
impl AgentRoster for InMemoryAgentRoster {
    async fn list_all(&self) -> AgentRosterResult<Vec<Agent>> {
        let state = self
            .state
            .read()
            .map_err(|err| AgentRosterError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.agents.clone())
    }

    async fn find_by_id(&self, id: &AgentId) -> AgentRosterResult<Option<Agent>> {
        let state = self
            .state
            .read()
            .map_err(|err| AgentRosterError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state
            .id_index
            .get(id)
            .and_then(|position| state.agents.get(*position))
            .cloned())
    }

    async fn find_by_role(&self, role: &str) -> AgentRosterResult<Vec<Agent>> {
        let state = self
            .state
            .read()
            .map_err(|err| AgentRosterError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state
            .agents
            .iter()
            .filter(|agent| agent.role() == role)
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: &AgentId, status: AgentStatus) -> AgentRosterResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| AgentRosterError::persistence(std::io::Error::other(err.to_string())))?;
        let position = *state
            .id_index
            .get(id)
            .ok_or_else(|| AgentRosterError::NotFound(id.clone()))?;
        let agent = state
            .agents
            .get_mut(position)
            .ok_or_else(|| AgentRosterError::NotFound(id.clone()))?;
        agent.set_status(status);
        Ok(())
    }
}
