//! Unit tests for the orchestrator.

mod dispatch_tests;
mod event_tests;
mod messaging_tests;
mod support;
