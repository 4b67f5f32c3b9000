//! Error responses for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobwatch_db::DatabaseError;
use jobwatch_scheduler::SchedulerError;
use serde::Serialize;

/// JSON error body returned by every handler.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Machine-readable code (e.g., `"BATCH_IN_PROGRESS"`)
    pub code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    /// Create an error with an explicit status.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Status this error is sent with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::Busy => Self::new(
                StatusCode::CONFLICT,
                "BATCH_IN_PROGRESS",
                "A scrape batch is already running",
            ),
            SchedulerError::ShuttingDown => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "SHUTTING_DOWN",
                "Server is shutting down",
            ),
            SchedulerError::AiUnavailable => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_UNAVAILABLE",
                err.to_string(),
            ),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        tracing::error!("Database query failed: {}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            "Failed to query stored jobs",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
