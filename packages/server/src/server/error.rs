//! HTTP error mapping.
//!
//! Every failure a handler can produce becomes an `ApiError`, which renders
//! as `{"code", "message", "correlationId", "timestamp"}`. The correlation id
//! is minted when the error is built and written to the log line for that
//! error, so a client report can be matched to the server log.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::common::PaginationError;
use crate::domains::patients::PatientError;

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    correlation_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    correlation_id: String,
    timestamp: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
            correlation_id: Uuid::new_v4(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        let err = Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg.into());
        tracing::warn!(correlation_id = %err.correlation_id, "Not found: {}", err.message);
        err
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let err = Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.into());
        tracing::warn!(correlation_id = %err.correlation_id, "Bad request: {}", err.message);
        err
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        let err = Self::new(StatusCode::CONFLICT, "CONFLICT", msg.into());
        tracing::warn!(correlation_id = %err.correlation_id, "Conflict: {}", err.message);
        err
    }

    /// The detail is logged with the correlation id and never sent to the client
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        let err = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error".to_string(),
        );
        tracing::error!(correlation_id = %err.correlation_id, "Internal error: {:#}", detail);
        err
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
            correlation_id: self.correlation_id.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::InvalidInput(msg) => ApiError::bad_request(msg),
            e @ PatientError::NotFound(_) => ApiError::not_found(e.to_string()),
            e @ PatientError::Duplicate { .. } => ApiError::conflict(e.to_string()),
            PatientError::Storage(e) => ApiError::internal(e),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
