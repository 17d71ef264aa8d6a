//! Unit tests for the agent roster.
