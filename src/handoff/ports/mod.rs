//! Port contracts for handoff storage.

mod repository;

pub use repository::{HandoffRepository, HandoffRepositoryError, HandoffRepositoryResult};
