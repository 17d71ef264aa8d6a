//! In-memory integration tests for the assembled services.
//!
//! Tests are organized into modules by functionality:
//! - `context_tests`: Building services from configuration and shutdown
//! - `task_flow_tests`: Assignment, dispatch, and agent availability

mod in_memory {
    pub mod helpers;

    mod context_tests;
    mod task_flow_tests;
}
