//! Application services for tool-server registry lookups.

mod registry;

pub use registry::{ToolRegistry, ToolRegistryServiceError, ToolRegistryServiceResult};
