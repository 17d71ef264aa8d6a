//! Domain model for the agent roster.

mod agent;
mod defaults;
mod error;
mod ids;
mod status;

pub use agent::Agent;
pub use defaults::default_roster;
pub use error::{AgentDomainError, ParseAgentStatusError};
pub use ids::AgentId;
pub use status::AgentStatus;
