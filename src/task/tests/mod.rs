//! Unit tests for task lifecycle management.

mod domain_tests;
