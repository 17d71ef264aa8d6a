//! Tests for agent-to-agent messaging.

use super::support::{TestOrchestrator, default_orchestrator};
use crate::error::{Classify, ErrorClass};
use crate::orchestrator::OrchestratorEvent;
use rstest::{fixture, rstest};
use serde_json::{Map, json};

#[fixture]
fn orchestrator() -> TestOrchestrator {
    default_orchestrator()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sent_message_is_stored_and_announced(orchestrator: TestOrchestrator) {
    let mut events = orchestrator.subscribe();
    let mut metadata = Map::new();
    metadata.insert("taskRef".to_owned(), json!("t-1"));

    let message = orchestrator
        .send_message("a1", "a2", "plan ready", metadata.clone())
        .await
        .expect("send should succeed");

    assert_eq!(message.sender().as_str(), "a1");
    assert_eq!(message.recipient().as_str(), "a2");
    assert_eq!(message.metadata(), &metadata);
    assert_eq!(
        events.try_recv().ok(),
        Some(OrchestratorEvent::MessageSent {
            message: message.clone()
        })
    );
    let stored = orchestrator
        .list_messages()
        .await
        .expect("listing should succeed");
    assert_eq!(stored, [message]);
}

#[rstest]
#[case("ghost", "a2")]
#[case("a1", "ghost")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_endpoint_is_not_found(
    orchestrator: TestOrchestrator,
    #[case] from: &str,
    #[case] to: &str,
) {
    let error = orchestrator
        .send_message(from, to, "hello", Map::new())
        .await
        .expect_err("send should fail");

    assert_eq!(error.classify(), ErrorClass::NotFound);
    let stored = orchestrator
        .list_messages()
        .await
        .expect("listing should succeed");
    assert!(stored.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_message_is_a_validation_error(orchestrator: TestOrchestrator) {
    let error = orchestrator
        .send_message("a1", "a2", " ", Map::new())
        .await
        .expect_err("send should fail");
    assert_eq!(error.classify(), ErrorClass::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn agent_view_excludes_unrelated_messages(orchestrator: TestOrchestrator) {
    for (from, to, content) in [("a1", "a2", "one"), ("a2", "a3", "two"), ("a3", "a1", "three")] {
        orchestrator
            .send_message(from, to, content, Map::new())
            .await
            .expect("send should succeed");
    }

    let for_a3 = orchestrator
        .list_messages_for_agent("a3")
        .await
        .expect("listing should succeed");
    let contents: Vec<&str> = for_a3.iter().map(|message| message.content()).collect();
    assert_eq!(contents, ["two", "three"]);

    let error = orchestrator
        .list_messages_for_agent("ghost")
        .await
        .expect_err("unknown agent should fail");
    assert_eq!(error.classify(), ErrorClass::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn messaging_leaves_agent_status_alone(orchestrator: TestOrchestrator) {
    let mut events = orchestrator.subscribe();
    orchestrator
        .send_message("a1", "a2", "fyi", Map::new())
        .await
        .expect("send should succeed");

    let first = events.try_recv().expect("message event");
    assert_eq!(first.name(), "message:sent");
    assert!(events.try_recv().is_err());
}
