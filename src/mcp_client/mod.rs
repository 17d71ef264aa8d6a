//! Model Context Protocol client.
//!
//! Maintains live sessions with configured tool servers, caches the tool
//! catalog each server advertises, and performs validated, safety-gated tool
//! calls. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Transport adapters in [`adapters`]
//! - Connection, catalog, and client services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
