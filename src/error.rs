//! Crate-wide error classification.
//!
//! Each module owns its `thiserror` enums. Service-level errors additionally
//! report an [`ErrorClass`] so adapters (the HTTP surface, the binary) can
//! decide how to present a failure without matching every variant.

use serde::Serialize;
use std::fmt;

/// Broad category of a failure, independent of the module that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Malformed input. Never retried automatically.
    Validation,
    /// An agent, role, server, task, or tool does not exist.
    NotFound,
    /// Rejected by the safety gate. Retrying cannot succeed.
    PolicyBlocked,
    /// Transport handshake or dispatch failure. Safe to retry with backoff.
    Connection,
    /// A deadline elapsed or the caller cancelled the operation.
    Timeout,
    /// A lifecycle transition the state machine forbids.
    InvalidStateTransition,
    /// Storage or runtime failure inside the process.
    Internal,
}

impl ErrorClass {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::PolicyBlocked => "policy_blocked",
            Self::Connection => "connection",
            Self::Timeout => "timeout",
            Self::InvalidStateTransition => "invalid_state_transition",
            Self::Internal => "internal",
        }
    }

    /// Returns whether a caller may retry the failed operation unchanged.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Connection | Self::Timeout)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors that can be mapped onto the crate-wide [`ErrorClass`] taxonomy.
pub trait Classify {
    /// Returns the class of this error.
    fn classify(&self) -> ErrorClass;
}
