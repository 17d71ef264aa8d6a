//! Adapter implementations for tool-server registry ports.

pub mod memory;
