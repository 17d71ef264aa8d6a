//! Unit tests for the MCP client services.

mod client_tests;
mod support;
