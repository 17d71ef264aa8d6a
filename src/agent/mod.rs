//! Agent roster for the orchestrator.
//!
//! Agents are loaded once at startup, either from configuration or from the
//! built-in default roster, and are never added or removed at runtime. Only
//! their status changes, and only the orchestrator changes it. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Registry service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
