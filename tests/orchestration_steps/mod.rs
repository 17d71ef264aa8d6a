//! Step definitions for orchestration scenarios.

mod given;
mod then;
mod when;
pub mod world;
