//! Error types for message validation.

use thiserror::Error;

/// Errors returned while constructing messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageDomainError {
    /// The message body is empty after trimming.
    #[error("message content must not be empty")]
    EmptyContent,
}
