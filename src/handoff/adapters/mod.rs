//! Adapter implementations for the handoff repository port.

pub mod memory;
