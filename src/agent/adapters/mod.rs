//! Adapter implementations for the agent roster port.

pub mod memory;
