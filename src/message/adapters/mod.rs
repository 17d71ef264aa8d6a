//! Adapter implementations for the message repository port.

pub mod memory;
