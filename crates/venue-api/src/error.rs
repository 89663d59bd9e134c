//! HTTP error responses

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use tracing::{debug, error};
use venue_backend::BackendError;
use venue_sheets::SheetError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by a handler or extractor
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Error code for API responses
    pub code: String,
    /// Error message
    pub message: String,
    /// Additional context
    pub details: Option<Value>,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional context
    pub details: Option<Value>,
}

impl ApiError {
    /// Create a new error
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 400 with code `BAD_REQUEST`
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// 404 with code `NOT_FOUND`
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// 502 with code `UPSTREAM_ERROR`
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message)
    }

    /// 500 with code `INTERNAL_ERROR`
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, code = %self.code, "{}", self.message);
        } else {
            debug!(status = %self.status, code = %self.code, "{}", self.message);
        }
        let body = ErrorResponse {
            error: self.message,
            code: self.code,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<venue_core::Error> for ApiError {
    fn from(error: venue_core::Error) -> Self {
        use venue_core::Error;
        match error {
            Error::Validation { field, message } => {
                Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
                    .with_details(json!({ "field": field }))
            }
            Error::SeatLimitExceeded {
                requested,
                available,
            } => Self::new(
                StatusCode::BAD_REQUEST,
                "SEAT_LIMIT_EXCEEDED",
                format!("{requested} employees requested but only {available} seats remain"),
            )
            .with_details(json!({ "requested": requested, "available": available })),
            Error::NotFound { resource } => Self::not_found(format!("{resource} not found")),
            Error::Spreadsheet(message) => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_SPREADSHEET", message)
            }
            Error::Backend(message) => Self::upstream(message),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Core(core) => core.into(),
            BackendError::NotFound { .. } => Self::not_found(error.to_string()),
            BackendError::Status {
                ref operation,
                status,
                ..
            } => {
                let details = json!({ "operation": operation, "status": status });
                if status == 404 {
                    Self::not_found(error.to_string()).with_details(details)
                } else {
                    Self::upstream(error.to_string()).with_details(details)
                }
            }
            BackendError::Configuration { .. } => Self::internal(error.to_string()),
            other => Self::upstream(other.to_string()),
        }
    }
}

impl From<SheetError> for ApiError {
    fn from(error: SheetError) -> Self {
        venue_core::Error::from(error).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "INVALID_JSON", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        venue_core::Error::from(errors).into()
    }
}
