//! Shared fixtures for orchestrator tests.

use crate::agent::adapters::memory::InMemoryAgentRoster;
use crate::agent::domain::{Agent, AgentId, AgentStatus};
use crate::message::adapters::memory::InMemoryMessageRepository;
use crate::orchestrator::Orchestrator;
use crate::task::adapters::memory::InMemoryTaskRepository;
use mockable::DefaultClock;
use std::sync::Arc;

pub type TestOrchestrator = Orchestrator<
    InMemoryAgentRoster,
    InMemoryTaskRepository,
    InMemoryMessageRepository,
    DefaultClock,
>;

pub fn agent(id: &str, role: &str) -> Agent {
    Agent::new(AgentId::new(id).expect("valid id"), role, format!("Agent {id}"))
        .expect("valid agent")
}

pub fn orchestrator_with(agents: impl IntoIterator<Item = Agent>) -> TestOrchestrator {
    let roster = InMemoryAgentRoster::from_agents(agents).expect("ids should be unique");
    Orchestrator::new(
        Arc::new(roster),
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryMessageRepository::new()),
        Arc::new(DefaultClock),
    )
}

pub fn default_orchestrator() -> TestOrchestrator {
    orchestrator_with([
        agent("a1", "planner"),
        agent("a2", "executor"),
        agent("a3", "planner"),
        agent("a4", "reviewer").with_status(AgentStatus::Offline),
    ])
}

pub async fn status_of(orchestrator: &TestOrchestrator, id: &str) -> AgentStatus {
    orchestrator
        .agents()
        .require(id)
        .await
        .expect("agent should exist")
        .status()
}
