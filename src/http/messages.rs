//! Agent messaging routes.

use super::ApiError;
use super::agents::non_blank;
use crate::context::ServiceContext;
use crate::mcp_client::ports::McpConnector;
use crate::message::domain::AgentMessage;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Serialize)]
pub(super) struct MessagesResponse {
    messages: Vec<AgentMessage>,
}

#[derive(Serialize)]
pub(super) struct MessageResponse {
    message: AgentMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageQuery {
    agent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SendMessageRequest {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

// GET /api/agents/messages[?agent=<id>]
pub(super) async fn list_messages<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<MessagesResponse>, ApiError>
where
    C: McpConnector + 'static,
{
    let orchestrator = context.orchestrator();
    let messages = match non_blank(query.agent) {
        Some(agent_id) => orchestrator.list_messages_for_agent(&agent_id).await?,
        None => orchestrator.list_messages().await?,
    };
    Ok(Json(MessagesResponse { messages }))
}

// POST /api/agents/messages {from, to, content, metadata?}
pub(super) async fn send_message<C>(
    State(context): State<Arc<ServiceContext<C>>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError>
where
    C: McpConnector + 'static,
{
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let (Some(from), Some(to), Some(content)) = (
        non_blank(request.from),
        non_blank(request.to),
        non_blank(request.content),
    ) else {
        return Err(ApiError::bad_request(
            "Message sender, recipient, and content are required",
        ));
    };

    let message = context
        .orchestrator()
        .send_message(&from, &to, content, request.metadata.unwrap_or_default())
        .await?;
    Ok((StatusCode::CREATED, Json(MessageResponse { message })))
}
