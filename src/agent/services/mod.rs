//! Agent registry service.

mod registry;

pub use registry::{AgentRegistry, AgentRegistryError, AgentRegistryResult};
