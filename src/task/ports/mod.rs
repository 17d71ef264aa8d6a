//! Port contracts for task storage.

mod repository;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
