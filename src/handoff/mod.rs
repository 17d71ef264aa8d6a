//! Handoffs of work between roster agents.
//!
//! A handoff passes data and instructions from one agent to another and
//! waits for the receiver to accept or reject it. Multi-step handoff plans
//! chain roles together and collect each step's output as they advance. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Handoff service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
