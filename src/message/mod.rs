//! Messages exchanged between roster agents.
//!
//! Messages form an append-only log. Either endpoint can list the messages it
//! sent or received. Sending goes through the orchestrator, which checks both
//! agents exist and announces the message to event subscribers.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Message log service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
