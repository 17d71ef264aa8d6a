//! Unit tests for task construction and identifiers.

use crate::agent::domain::AgentId;
use crate::task::domain::{Task, TaskDomainError, TaskId, TaskStatus};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Map, json};
use std::collections::HashSet;

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn agent_id() -> AgentId {
    AgentId::new("a1").expect("valid agent id")
}

#[rstest]
fn new_task_is_pending_with_creation_timestamp(clock: DefaultClock, agent_id: AgentId) {
    let mut parameters = Map::new();
    parameters.insert("toolId".to_owned(), json!("fs:read_file"));

    let task = Task::new(agent_id.clone(), "plan X", parameters.clone(), &clock)
        .expect("task should be valid");

    assert_eq!(task.status(), TaskStatus::Pending);
    assert_eq!(task.agent_id(), &agent_id);
    assert_eq!(task.description(), "plan X");
    assert_eq!(task.parameters(), &parameters);
    assert!(task.started_at().is_none());
    assert!(task.completed_at().is_none());
    assert!(task.result().is_none());
    assert!(task.error().is_none());
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_description_is_rejected(clock: DefaultClock, agent_id: AgentId, #[case] description: &str) {
    let result = Task::new(agent_id, description, Map::new(), &clock);
    assert_eq!(result, Err(TaskDomainError::EmptyDescription));
}

#[rstest]
fn task_ids_are_unique(clock: DefaultClock, agent_id: AgentId) {
    let ids: HashSet<TaskId> = (0..100)
        .map(|_| {
            Task::new(agent_id.clone(), "work", Map::new(), &clock)
                .expect("task should be valid")
                .id()
        })
        .collect();
    assert_eq!(ids.len(), 100);
}

#[rstest]
fn task_id_parses_its_display_form() {
    let id = TaskId::new();
    let parsed: TaskId = id.to_string().parse().expect("display form should parse");
    assert_eq!(parsed, id);
}

#[rstest]
fn malformed_task_id_is_rejected() {
    let result = "not-a-uuid".parse::<TaskId>();
    assert_eq!(
        result,
        Err(TaskDomainError::InvalidTaskId("not-a-uuid".to_owned()))
    );
}

#[rstest]
fn pending_task_serializes_without_outcome_fields(clock: DefaultClock, agent_id: AgentId) {
    let task = Task::new(agent_id, "plan X", Map::new(), &clock).expect("task should be valid");
    let json = serde_json::to_value(&task).expect("task should serialize");

    assert_eq!(json["agentId"], "a1");
    assert_eq!(json["status"], "pending");
    assert!(json.get("createdAt").is_some());
    assert!(json.get("result").is_none());
    assert!(json.get("startedAt").is_none());
}
