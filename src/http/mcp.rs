//! Tool-server connection and tool-call routes.

use super::ApiError;
use crate::context::ServiceContext;
use crate::deadline::Deadline;
use crate::mcp_client::domain::{ConnectedServer, ConnectionState, ToolDescriptor};
use crate::mcp_client::ports::McpConnector;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ServerRequest {
    #[serde(default)]
    server_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ConnectResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    already_connected: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DisconnectResponse {
    success: bool,
    was_connected: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ServersResponse {
    servers: Vec<ConnectedServer>,
    available: Vec<AvailableServer>,
}

/// Configured server as listed to clients; transport settings stay private.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AvailableServer {
    name: String,
    transport: &'static str,
    categories: Vec<String>,
    enabled: bool,
    state: ConnectionState,
}

#[derive(Debug, Deserialize)]
pub(super) struct ToolQuery {
    category: Option<String>,
}

#[derive(Serialize)]
pub(super) struct ToolsResponse {
    tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CallRequest {
    #[serde(default)]
    tool_id: Option<String>,
    #[serde(default)]
    args: Option<Value>,
}

#[derive(Serialize)]
pub(super) struct CallResponse {
    result: Value,
}

fn server_name(payload: Result<Json<ServerRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    request
        .server_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::bad_request("Server name is required"))
}

// POST /api/mcp/connect {serverName}
pub(super) async fn connect<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    payload: Result<Json<ServerRequest>, JsonRejection>,
) -> Result<Json<ConnectResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let name = server_name(payload)?;
    let descriptor = context
        .servers()
        .resolve_for_connect(&name)
        .await
        .map_err(ApiError::from_server_lookup)?;
    let outcome = context
        .client()
        .connect(&descriptor, &Deadline::after(context.connect_timeout()))
        .await?;

    Ok(Json(ConnectResponse {
        success: true,
        already_connected: outcome.already_connected().then_some(true),
    }))
}

// POST /api/mcp/disconnect {serverName}
pub(super) async fn disconnect<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    payload: Result<Json<ServerRequest>, JsonRejection>,
) -> Result<Json<DisconnectResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let name = server_name(payload)?;
    let was_connected = context.client().disconnect(&name).await;
    Ok(Json(DisconnectResponse {
        success: true,
        was_connected,
    }))
}

// GET /api/mcp/servers
pub(super) async fn list_servers<C>(
    State(context): State<Arc<ServiceContext<C>>>,
) -> Result<Json<ServersResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let client = context.client();
    let available = context
        .servers()
        .list_servers()
        .await?
        .into_iter()
        .map(|descriptor| AvailableServer {
            name: descriptor.name().as_str().to_owned(),
            transport: descriptor.transport().kind(),
            categories: descriptor.categories().to_vec(),
            enabled: descriptor.is_enabled(),
            state: client.connection_state(descriptor.name().as_str()),
        })
        .collect();

    Ok(Json(ServersResponse {
        servers: client.connected_servers(),
        available,
    }))
}

// GET /api/mcp/tools[?category=<tag>]
pub(super) async fn list_tools<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    Query(query): Query<ToolQuery>,
) -> Json<ToolsResponse>
where
    C: McpConnector + 'static,
{
    let client = context.client();
    let tools = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => client.list_tools_by_category(category),
        _ => client.list_tools(),
    };
    Json(ToolsResponse { tools })
}

// POST /api/mcp/call {toolId, args}
pub(super) async fn call_tool<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    payload: Result<Json<CallRequest>, JsonRejection>,
) -> Result<Json<CallResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let tool_id = request
        .tool_id
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Tool ID is required"))?;
    let arguments = match request.args {
        Some(Value::Object(arguments)) => arguments,
        None | Some(Value::Null) => Map::new(),
        Some(_) => return Err(ApiError::bad_request("Tool arguments must be an object")),
    };

    let result = context
        .client()
        .call_tool(&tool_id, arguments, &Deadline::after(context.call_timeout()))
        .await
        .map_err(ApiError::from)?;
    Ok(Json(CallResponse { result }))
}
