//! Port contracts for the agent roster.

mod roster;

pub use roster::{AgentRoster, AgentRosterError, AgentRosterResult};
