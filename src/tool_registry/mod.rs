//! Configured catalog of MCP tool servers.
//!
//! The registry holds immutable server descriptors loaded once at startup,
//! validates their configuration before a connection is attempted, and
//! provides the built-in default server set used when configuration lists no
//! servers. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Lookup services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
