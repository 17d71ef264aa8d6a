//! Application services for agent handoffs.

mod handoff;

pub use handoff::{CreateHandoff, HandoffService, HandoffServiceError, HandoffServiceResult};
