//! Tests for background dispatch through a task executor.

use super::support::{TestOrchestrator, default_orchestrator, status_of};
use crate::agent::domain::AgentStatus;
use crate::error::{Classify, ErrorClass};
use crate::orchestrator::{MockTaskExecutor, TaskExecutionError};
use crate::task::domain::TaskStatus;
use rstest::{fixture, rstest};
use serde_json::{Map, json};
use std::sync::Arc;

#[fixture]
fn orchestrator() -> Arc<TestOrchestrator> {
    Arc::new(default_orchestrator())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_execution_completes_the_task(orchestrator: Arc<TestOrchestrator>) {
    let task = orchestrator
        .assign_task("a2", "build", Map::new())
        .await
        .expect("assignment should succeed");
    let mut executor = MockTaskExecutor::new();
    executor
        .expect_execute()
        .withf(|running| running.status() == TaskStatus::Running)
        .times(1)
        .returning(|_| Ok(json!({"built": true})));

    let finished = orchestrator
        .dispatch(task.id(), Arc::new(executor))
        .await
        .expect("dispatch should join")
        .expect("dispatch should succeed");

    assert_eq!(finished.status(), TaskStatus::Completed);
    assert_eq!(finished.result(), Some(&json!({"built": true})));
    assert!(finished.started_at().is_some());
    assert!(finished.completed_at().is_some());
    assert_eq!(status_of(&orchestrator, "a2").await, AgentStatus::Idle);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_execution_records_the_error(orchestrator: Arc<TestOrchestrator>) {
    let task = orchestrator
        .assign_task("a2", "build", Map::new())
        .await
        .expect("assignment should succeed");
    let mut executor = MockTaskExecutor::new();
    executor
        .expect_execute()
        .times(1)
        .returning(|_| Err(TaskExecutionError::Other("compiler exploded".to_owned())));

    let finished = orchestrator
        .dispatch(task.id(), Arc::new(executor))
        .await
        .expect("dispatch should join")
        .expect("failure should be recorded");

    assert_eq!(finished.status(), TaskStatus::Failed);
    assert_eq!(finished.error(), Some("compiler exploded"));
    assert_eq!(status_of(&orchestrator, "a2").await, AgentStatus::Idle);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatching_a_started_task_skips_the_executor(orchestrator: Arc<TestOrchestrator>) {
    let task = orchestrator
        .assign_task("a1", "plan", Map::new())
        .await
        .expect("assignment should succeed");
    orchestrator
        .mark_running(task.id())
        .await
        .expect("start should succeed");
    let mut executor = MockTaskExecutor::new();
    executor.expect_execute().never();

    let error = orchestrator
        .dispatch(task.id(), Arc::new(executor))
        .await
        .expect("dispatch should join")
        .expect_err("second start should fail");

    assert_eq!(error.classify(), ErrorClass::InvalidStateTransition);
}
