//! Port contracts for message storage.

mod repository;

pub use repository::{MessageRepository, MessageRepositoryError, MessageRepositoryResult};
