//! Domain model for task lifecycle management.
//!
//! Tasks carry the assigning agent, a free-form description, caller-supplied
//! parameters, and the outcome once the task finishes. All infrastructure
//! concerns are kept outside the domain boundary.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use task::{Task, TaskStatus};
