//! Tests for lifecycle event publication.

use super::support::{TestOrchestrator, default_orchestrator};
use crate::agent::domain::{AgentId, AgentStatus};
use crate::orchestrator::{EventBus, OrchestratorEvent};
use crate::task::domain::TaskStatus;
use rstest::{fixture, rstest};
use serde_json::{Map, json};
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

#[fixture]
fn orchestrator() -> TestOrchestrator {
    default_orchestrator()
}

fn drain(receiver: &mut Receiver<OrchestratorEvent>) -> Vec<OrchestratorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

fn names(events: &[OrchestratorEvent]) -> Vec<&'static str> {
    events.iter().map(OrchestratorEvent::name).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignment_announces_task_and_busy_agent(orchestrator: TestOrchestrator) {
    let mut events = orchestrator.subscribe();

    let task = orchestrator
        .assign_task("a2", "build", Map::new())
        .await
        .expect("assignment should succeed");

    let published = drain(&mut events);
    assert_eq!(
        published,
        [
            OrchestratorEvent::TaskAssigned { task },
            OrchestratorEvent::AgentStatusChanged {
                agent_id: AgentId::new("a2").expect("valid id"),
                status: AgentStatus::Busy,
            },
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offline_agent_assignment_changes_no_status(orchestrator: TestOrchestrator) {
    let mut events = orchestrator.subscribe();

    orchestrator
        .assign_task("a4", "review", Map::new())
        .await
        .expect("assignment should succeed");

    assert_eq!(names(&drain(&mut events)), ["task:assigned"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_announces_result_then_idle_agent(orchestrator: TestOrchestrator) {
    let task = orchestrator
        .assign_task("a2", "build", Map::new())
        .await
        .expect("assignment should succeed");
    orchestrator.mark_running(task.id()).await.expect("start");
    let mut events = orchestrator.subscribe();

    orchestrator
        .mark_completed(task.id(), json!("ok"))
        .await
        .expect("completion should succeed");

    let published = drain(&mut events);
    assert_eq!(names(&published), ["task:completed", "agent:status-changed"]);
    let Some(OrchestratorEvent::TaskCompleted { task: completed }) = published.first() else {
        panic!("expected a completion event, got {published:?}");
    };
    assert_eq!(completed.status(), TaskStatus::Completed);
    assert_eq!(completed.result(), Some(&json!("ok")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failure_announces_error(orchestrator: TestOrchestrator) {
    let task = orchestrator
        .assign_task("a2", "build", Map::new())
        .await
        .expect("assignment should succeed");
    orchestrator.mark_running(task.id()).await.expect("start");
    let mut events = orchestrator.subscribe();

    orchestrator
        .mark_failed(task.id(), "boom")
        .await
        .expect("failure should be recorded");

    let published = drain(&mut events);
    assert_eq!(names(&published), ["task:failed", "agent:status-changed"]);
    let Some(OrchestratorEvent::TaskFailed { task: failed }) = published.first() else {
        panic!("expected a failure event, got {published:?}");
    };
    assert_eq!(failed.error(), Some("boom"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_transition_publishes_nothing(orchestrator: TestOrchestrator) {
    let task = orchestrator
        .assign_task("a2", "build", Map::new())
        .await
        .expect("assignment should succeed");
    let mut events = orchestrator.subscribe();

    orchestrator
        .mark_completed(task.id(), json!("early"))
        .await
        .expect_err("pending task cannot complete");

    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[rstest]
fn dropping_a_receiver_unsubscribes() {
    let bus = EventBus::default();
    let first = bus.subscribe();
    let mut second = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 2);

    drop(first);
    assert_eq!(bus.subscriber_count(), 1);

    bus.publish(OrchestratorEvent::AgentStatusChanged {
        agent_id: AgentId::new("a1").expect("valid id"),
        status: AgentStatus::Idle,
    });
    assert!(second.try_recv().is_ok());
}

#[rstest]
fn publishing_without_subscribers_is_harmless() {
    let bus = EventBus::new(4);
    bus.publish(OrchestratorEvent::AgentStatusChanged {
        agent_id: AgentId::new("a1").expect("valid id"),
        status: AgentStatus::Busy,
    });
    assert_eq!(bus.subscriber_count(), 0);
}

#[rstest]
fn events_serialize_with_their_wire_names() {
    let event = OrchestratorEvent::AgentStatusChanged {
        agent_id: AgentId::new("a1").expect("valid id"),
        status: AgentStatus::Busy,
    };

    let value = serde_json::to_value(&event).expect("serializable");
    assert_eq!(
        value,
        json!({"event": "agent:status-changed", "agentId": "a1", "status": "busy"})
    );
}
