//! JSON error responses.

use crate::error::{Classify, ErrorClass};
use crate::tool_registry::services::ToolRegistryServiceError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

/// Maps an error class onto an HTTP status.
#[must_use]
pub const fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Validation => StatusCode::BAD_REQUEST,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::PolicyBlocked => StatusCode::FORBIDDEN,
        ErrorClass::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorClass::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorClass::Connection | ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error rendered as `{"error": message, "details": [..]}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    details: &'a [String],
}

impl ApiError {
    /// Creates an error with `status`.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Creates a `400 Bad Request` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a `404 Not Found` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Attaches detail lines.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Maps a server lookup failure, listing validation problems as details.
    #[must_use]
    pub fn from_server_lookup(err: ToolRegistryServiceError) -> Self {
        match err {
            ToolRegistryServiceError::InvalidServerConfig { ref errors, .. } => {
                let details = errors.clone();
                Self::bad_request(err.to_string()).with_details(details)
            }
            other => other.into(),
        }
    }

    /// Maps a rejected JSON body.
    #[must_use]
    pub fn from_rejection(rejection: &JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl<E> From<E> for ApiError
where
    E: Classify + std::error::Error,
{
    fn from(err: E) -> Self {
        let class = err.classify();
        let status = status_for(class);
        if status.is_server_error() {
            error!(class = %class, error = %err, "request failed");
        } else {
            warn!(class = %class, error = %err, "request rejected");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            details: &self.details,
        };
        (self.status, Json(body)).into_response()
    }
}
