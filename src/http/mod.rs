//! HTTP surface.
//!
//! Routes are thin: each handler parses its request, calls one service
//! operation on the shared [`ServiceContext`], and renders the outcome.
//! Failures become [`ApiError`] responses whose status follows the error's
//! [`crate::error::ErrorClass`].

mod agents;
mod error;
mod handoffs;
mod mcp;
mod messages;

pub use error::{ApiError, status_for};

use crate::context::ServiceContext;
use crate::mcp_client::ports::McpConnector;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router over `context`.
pub fn router<C>(context: Arc<ServiceContext<C>>) -> Router
where
    C: McpConnector + 'static,
{
    Router::new()
        .route("/api/health", get(health))
        .route("/api/agents", get(agents::list_agents::<C>))
        .route(
            "/api/agents/tasks",
            get(agents::list_tasks::<C>).post(agents::assign_task::<C>),
        )
        .route(
            "/api/agents/messages",
            get(messages::list_messages::<C>).post(messages::send_message::<C>),
        )
        .route(
            "/api/agents/handoffs",
            get(handoffs::pending_handoffs::<C>).post(handoffs::create_handoff::<C>),
        )
        .route(
            "/api/agents/handoffs/:id/accept",
            post(handoffs::accept_handoff::<C>),
        )
        .route(
            "/api/agents/handoffs/:id/reject",
            post(handoffs::reject_handoff::<C>),
        )
        .route("/api/agents/handoff-plans", post(handoffs::create_plan::<C>))
        .route(
            "/api/agents/handoff-plans/:id/advance",
            post(handoffs::advance_plan::<C>),
        )
        .route("/api/agents/workflows", get(handoffs::recommend_workflow))
        .route("/api/mcp/connect", post(mcp::connect::<C>))
        .route("/api/mcp/disconnect", post(mcp::disconnect::<C>))
        .route("/api/mcp/servers", get(mcp::list_servers::<C>))
        .route("/api/mcp/tools", get(mcp::list_tools::<C>))
        .route("/api/mcp/call", post(mcp::call_tool::<C>))
        .with_state(context)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
