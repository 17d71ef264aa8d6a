//! Tests for the ordered tool-call pipeline.

use super::support::{args, fs_connector, server};
use crate::deadline::Deadline;
use crate::error::{Classify, ErrorClass};
use crate::mcp_client::adapters::InMemoryMcpConnector;
use crate::mcp_client::domain::{McpClientError, PropertyKind};
use crate::mcp_client::ports::{DiscoveredTool, McpSessionError};
use crate::mcp_client::services::McpClient;
use crate::security::{SecurityGate, TypedValidator};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn connected(connector: &InMemoryMcpConnector, gate: SecurityGate) -> McpClient<InMemoryMcpConnector> {
    let client = McpClient::new(Arc::new(connector.clone()), gate);
    client
        .connect(&server("fs"), &Deadline::unbounded())
        .await
        .expect("connect should succeed");
    client
}

#[fixture]
fn connector() -> InMemoryMcpConnector {
    fs_connector()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn valid_call_returns_remote_result_verbatim(connector: InMemoryMcpConnector) {
    let scripted = json!({"content": [{"type": "text", "text": "file body"}]});
    let scripted_connector = connector.with_tool_result("fs", "read_file", scripted.clone());
    let client = connected(&scripted_connector, SecurityGate::default()).await;

    let result = client
        .call_tool("fs:read_file", args(json!({"path": "/tmp/a"})), &Deadline::unbounded())
        .await
        .expect("call should succeed");

    assert_eq!(result, scripted);
    let calls = scripted_connector.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls.first().map(|call| call.tool.as_str()), Some("read_file"));
}

#[rstest]
#[case("fs")]
#[case("fs:")]
#[case(":read_file")]
#[case("fs:read:file")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_tool_id_is_rejected_first(connector: InMemoryMcpConnector, #[case] tool_id: &str) {
    let client = connected(&connector, SecurityGate::new(true)).await;

    let error = client
        .call_tool(tool_id, args(json!({})), &Deadline::unbounded())
        .await
        .expect_err("malformed id should fail");

    assert!(matches!(error, McpClientError::InvalidToolId(_)));
    assert_eq!(error.classify(), ErrorClass::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn demo_mode_blocks_before_catalog_lookup(connector: InMemoryMcpConnector) {
    let client = McpClient::new(Arc::new(connector.clone()), SecurityGate::new(true));

    let error = client
        .call_tool("filesystem:delete_file", args(json!({})), &Deadline::unbounded())
        .await
        .expect_err("blocked call should fail");

    assert!(matches!(error, McpClientError::OperationBlocked { .. }));
    assert_eq!(error.classify(), ErrorClass::PolicyBlocked);
    assert_eq!(connector.connect_count("filesystem"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocked_operation_is_allowed_outside_demo_mode(connector: InMemoryMcpConnector) {
    let gate = SecurityGate::new(false).with_blocked_operations(["write_file"]);
    let client = connected(&connector, gate).await;

    client
        .call_tool(
            "fs:write_file",
            args(json!({"path": "/a", "content": "x"})),
            &Deadline::unbounded(),
        )
        .await
        .expect("call should succeed outside demo mode");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tool_is_not_found(connector: InMemoryMcpConnector) {
    let client = connected(&connector, SecurityGate::default()).await;

    let error = client
        .call_tool("fs:delete_everything", args(json!({})), &Deadline::unbounded())
        .await
        .expect_err("unknown tool should fail");

    assert!(matches!(error, McpClientError::ToolNotFound { ref tool_id } if tool_id == "fs:delete_everything"));
    assert_eq!(error.classify(), ErrorClass::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_missing_field_is_reported_without_dispatch(connector: InMemoryMcpConnector) {
    let client = connected(&connector, SecurityGate::default()).await;

    let error = client
        .call_tool("fs:write_file", args(json!({"content": null})), &Deadline::unbounded())
        .await
        .expect_err("missing fields should fail");

    assert!(matches!(
        error,
        McpClientError::MissingRequiredField { ref field, .. } if field == "path"
    ));
    assert!(connector.calls().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn typed_validator_rejects_wrong_kinds() {
    let connector = InMemoryMcpConnector::new().with_tools(
        "fs",
        [DiscoveredTool::new(
            "read_file",
            "Read",
            json!({"properties": {"path": {"type": "string"}}, "required": ["path"]}),
        )],
    );
    let client = McpClient::new(Arc::new(connector.clone()), SecurityGate::default())
        .with_validator(Arc::new(TypedValidator));
    client
        .connect(&server("fs"), &Deadline::unbounded())
        .await
        .expect("connect should succeed");

    let error = client
        .call_tool("fs:read_file", args(json!({"path": 42})), &Deadline::unbounded())
        .await
        .expect_err("wrong kind should fail");

    assert!(matches!(
        error,
        McpClientError::InvalidArgument { ref field, expected: PropertyKind::String, .. } if field == "path"
    ));
    assert!(connector.calls().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remote_failure_is_a_connection_class_error(connector: InMemoryMcpConnector) {
    let failing = connector.with_tool_error(
        "fs",
        "read_file",
        McpSessionError::ToolFailed("permission denied".to_owned()),
    );
    let client = connected(&failing, SecurityGate::default()).await;

    let error = client
        .call_tool("fs:read_file", args(json!({"path": "/root"})), &Deadline::unbounded())
        .await
        .expect_err("remote failure should surface");

    assert!(matches!(error, McpClientError::RemoteError { .. }));
    assert_eq!(error.classify(), ErrorClass::Connection);
    assert!(client.is_connected("fs"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn slow_call_times_out(connector: InMemoryMcpConnector) {
    let slow = connector.with_call_delay(Duration::from_secs(60));
    let client = connected(&slow, SecurityGate::default()).await;

    let error = client
        .call_tool(
            "fs:read_file",
            args(json!({"path": "/a"})),
            &Deadline::after(Duration::from_secs(1)),
        )
        .await
        .expect_err("call should time out");

    assert!(matches!(error, McpClientError::Timeout { ref target, .. } if target == "fs:read_file"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_follow_connections(connector: InMemoryMcpConnector) {
    let client = connected(&connector, SecurityGate::default()).await;
    assert_eq!(client.list_tools().len(), 2);
    assert_eq!(client.list_tools_by_category("files").len(), 2);
    assert!(client.list_tools_by_category("web").is_empty());

    let closed = client.disconnect_all().await;
    assert_eq!(closed, ["fs"]);
    assert!(client.list_tools().is_empty());
}
