//! Unit tests for handoffs and handoff plans.
