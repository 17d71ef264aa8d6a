//! Port contracts for tool-server descriptor lookup.

mod repository;

pub use repository::{ServerRegistryError, ServerRegistryRepository, ServerRegistryResult};
