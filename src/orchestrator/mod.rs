//! Task orchestration across the agent roster.
//!
//! [`Orchestrator`] resolves roles to agents, records task assignments, and
//! keeps agent availability in step with task lifecycles. Execution is
//! delegated to a [`TaskExecutor`]; [`ToolCallExecutor`] bridges tasks to the
//! MCP client. Agents exchange messages through the orchestrator, and
//! lifecycle changes are broadcast as [`OrchestratorEvent`]s.

mod error;
mod events;
mod executor;
mod service;

pub use error::{OrchestratorError, OrchestratorResult};
pub use events::{EVENT_CAPACITY, EventBus, OrchestratorEvent};
pub use executor::{
    ARGS_PARAMETER, TOOL_ID_PARAMETER, TaskExecutionError, TaskExecutor, ToolCallExecutor,
};
pub use service::Orchestrator;

#[cfg(test)]
pub use executor::MockTaskExecutor;

#[cfg(test)]
mod tests;
