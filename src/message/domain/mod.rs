//! Domain model for agent messages.

mod error;
mod ids;
mod message;

pub use error::MessageDomainError;
pub use ids::MessageId;
pub use message::AgentMessage;
