//! Unit tests for configuration loading.

mod loading_tests;
