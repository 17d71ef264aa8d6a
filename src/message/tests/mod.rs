//! Unit tests for the message log.
