//! Built-in roster used when configuration lists no agents.

use super::{Agent, AgentDomainError, AgentId};

const DEFAULT_AGENTS: [(&str, &str, &str, [&str; 3]); 5] = [
    (
        "planner",
        "Strategy Planner",
        "Breaks down complex goals into actionable steps",
        ["planning", "task-decomposition", "dependency-analysis"],
    ),
    (
        "executor",
        "Task Executor",
        "Executes tasks and carries out actions",
        ["execution", "tool-use", "error-handling"],
    ),
    (
        "reviewer",
        "Quality Reviewer",
        "Reviews outputs for quality and correctness",
        ["review", "quality-assurance", "feedback"],
    ),
    (
        "researcher",
        "Information Researcher",
        "Gathers and synthesizes information",
        ["research", "information-gathering", "synthesis"],
    ),
    (
        "coordinator",
        "Workflow Coordinator",
        "Coordinates between agents and manages workflow",
        ["coordination", "routing", "monitoring"],
    ),
];

/// Returns the default roster: one idle agent per built-in role, with ids of
/// the form `agent-<role>`.
///
/// # Errors
///
/// Returns an [`AgentDomainError`] if a built-in entry is malformed.
pub fn default_roster() -> Result<Vec<Agent>, AgentDomainError> {
    DEFAULT_AGENTS
        .iter()
        .map(|(role, display_name, description, capabilities)| {
            let id = AgentId::new(format!("agent-{role}"))?;
            Ok(Agent::new(id, *role, *display_name)?
                .with_description(*description)
                .with_capabilities(*capabilities))
        })
        .collect()
}
