//! Error types for backend and endpoint calls

use thiserror::Error;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while talking to the backend or the REST endpoints
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response
    #[error("{operation} returned {status}: {message}")]
    Status {
        /// What was being attempted
        operation: String,
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Response body had an unexpected shape
    #[error("Failed to decode {what}: {message}")]
    Decode {
        /// What was being decoded
        what: String,
        /// Decoder message
        message: String,
    },

    /// Row does not exist
    #[error("{table}/{id} not found")]
    NotFound {
        /// Table searched
        table: String,
        /// Id searched for
        id: String,
    },

    /// `Content-Range` header missing or malformed
    #[error("Invalid Content-Range header: {0:?}")]
    InvalidContentRange(String),

    /// Client misconfigured
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Rejected before any network call
    #[error(transparent)]
    Core(#[from] venue_core::Error),
}

impl BackendError {
    /// Create a decode error
    pub fn decode(what: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            message: message.to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found(table: impl std::fmt::Display, id: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.to_string(),
            id: id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error means the row is missing
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Core(venue_core::Error::NotFound { .. })
        ) || matches!(self, Self::Status { status: 404, .. })
    }

    /// Whether the error was raised by local validation
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Core(
                venue_core::Error::Validation { .. } | venue_core::Error::SeatLimitExceeded { .. }
            )
        )
    }
}

impl From<validator::ValidationErrors> for BackendError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Core(errors.into())
    }
}

/// Pull a readable message out of an error body
///
/// Looks at the `message`, `error`, `msg` and `details` keys the backend and
/// the REST endpoints use; falls back to the raw text.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error", "msg", "details"]
                .iter()
                .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Turn a non-success response into [`BackendError::Status`]
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    operation: &str,
) -> BackendResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        operation: operation.to_string(),
        status: status.as_u16(),
        message: error_message(&body),
    })
}
