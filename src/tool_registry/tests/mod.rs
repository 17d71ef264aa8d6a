//! Unit tests for the tool registry module.
