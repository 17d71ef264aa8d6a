//! Integration tests for assignment, dispatch, and agent availability.

use super::helpers::{TestContext, build_context, connect, connector, context, object};
use futures::future::join_all;
use rstest::rstest;
use serde_json::{Map, json};
use std::sync::Arc;
use switchboard::agent::domain::AgentStatus;
use switchboard::mcp_client::adapters::InMemoryMcpConnector;
use switchboard::security::SecurityGate;
use switchboard::task::domain::{Task, TaskStatus};

async fn agent_status(context: &TestContext, id: &str) -> AgentStatus {
    context
        .orchestrator()
        .agents()
        .require(id)
        .await
        .expect("agent should exist")
        .status()
}

async fn run_tool_task(context: &TestContext, role: &str, parameters: serde_json::Value) -> Task {
    let orchestrator = context.orchestrator();
    let task = orchestrator
        .resolve_role_and_assign(role, "tool task", object(parameters))
        .await
        .expect("assignment should succeed");
    orchestrator
        .dispatch(task.id(), Arc::clone(context.executor()))
        .await
        .expect("dispatch should not panic")
        .expect("dispatch should record an outcome")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn agent_stays_busy_until_its_last_task_ends(context: Arc<TestContext>) {
    let orchestrator = context.orchestrator();
    let first = orchestrator
        .assign_task("a1", "draft plan", Map::new())
        .await
        .expect("first assignment should succeed");
    let second = orchestrator
        .assign_task("a1", "refine plan", Map::new())
        .await
        .expect("second assignment should succeed");

    orchestrator
        .mark_running(first.id())
        .await
        .expect("first should start");
    orchestrator
        .mark_completed(first.id(), json!({"steps": 3}))
        .await
        .expect("first should complete");
    assert_eq!(agent_status(&context, "a1").await, AgentStatus::Busy);

    orchestrator
        .mark_running(second.id())
        .await
        .expect("second should start");
    orchestrator
        .mark_failed(second.id(), "model unavailable")
        .await
        .expect("second should fail");
    assert_eq!(agent_status(&context, "a1").await, AgentStatus::Idle);

    let active = orchestrator
        .list_active_tasks()
        .await
        .expect("active tasks should list");
    assert!(active.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_tool_tasks_all_complete(connector: InMemoryMcpConnector) {
    let context = build_context(connector.clone(), SecurityGate::new(false));
    connect(&context, "fs").await;

    let roles = ["planner", "executor"].into_iter().cycle().take(8);
    let runs = roles.enumerate().map(|(index, role)| {
        let parameters = json!({
            "toolId": "fs:read_file",
            "args": {"path": format!("/notes/{index}.md")}
        });
        run_tool_task(&context, role, parameters)
    });
    let finished = join_all(runs).await;

    assert!(finished
        .iter()
        .all(|task| task.status() == TaskStatus::Completed));
    assert_eq!(connector.calls().len(), 8);
    assert_eq!(agent_status(&context, "a1").await, AgentStatus::Idle);
    assert_eq!(agent_status(&context, "a2").await, AgentStatus::Idle);

    let listed = context
        .orchestrator()
        .list_tasks()
        .await
        .expect("tasks should list");
    assert_eq!(listed.len(), 8);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_on_disconnected_server_fails(context: Arc<TestContext>) {
    let task = run_tool_task(
        &context,
        "planner",
        json!({"toolId": "fs:read_file", "args": {"path": "/a"}}),
    )
    .await;

    assert_eq!(task.status(), TaskStatus::Failed);
    assert!(task.error().is_some_and(|error| error.contains("not found")));
    assert_eq!(agent_status(&context, "a1").await, AgentStatus::Idle);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn demo_mode_blocks_tool_tasks_without_dispatch(connector: InMemoryMcpConnector) {
    let gate = SecurityGate::new(true).with_blocked_operations(["write_file"]);
    let context = build_context(connector.clone(), gate);
    connect(&context, "fs").await;

    let task = run_tool_task(
        &context,
        "executor",
        json!({"toolId": "fs:write_file", "args": {"path": "/a", "content": "x"}}),
    )
    .await;

    assert_eq!(task.status(), TaskStatus::Failed);
    assert!(task
        .error()
        .is_some_and(|error| error.contains("blocked in demo mode")));
    assert!(connector.calls().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_for_unknown_agent_are_not_found(context: Arc<TestContext>) {
    let result = context.orchestrator().list_tasks_for_agent("ghost").await;
    assert!(result.is_err());
}
