//! Task records and their lifecycle.
//!
//! A task is created `Pending` when the orchestrator assigns it to an agent,
//! and moves monotonically through `Running` to `Completed` or `Failed`.
//! Transitions are guarded by the domain state machine and applied to the
//! store with compare-and-swap on the previous status. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Lifecycle service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
