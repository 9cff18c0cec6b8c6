//! Service error type with HTTP status code mapping.
//!
//! [`TrackerError`] is what a failed ingestion cycle or settings operation
//! surfaces to the API façade. Each variant maps to an HTTP status code and
//! a numeric error code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::fetch::FetchError;
use crate::persistence::StoreError;
use crate::pipeline::IntegrityError;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "fetch failed: timed out after 60s fetching https://..."
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure of a façade operation.
///
/// # Error Code Ranges
///
/// | Range     | Category    | HTTP Status                 |
/// |-----------|-------------|-----------------------------|
/// | 1000–1999 | Validation  | 400 Bad Request             |
/// | 2000–2999 | Upstream    | 502 Bad Gateway / 504       |
/// | 3000–3999 | Server      | 500 Internal Server Error   |
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Fetching from the tournament site failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Reading or replacing a persisted artifact failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// A merged history violated an ordering or uniqueness invariant.
    #[error("data integrity violation: {0}")]
    Integrity(#[from] IntegrityError),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Fetch(FetchError::Timeout { .. }) => 2002,
            Self::Fetch(FetchError::MissingSource { .. }) => 2003,
            Self::Fetch(_) => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Integrity(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) | Self::Integrity(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_timeout_is_gateway_timeout() {
        let err = TrackerError::from(FetchError::Timeout {
            url: "http://feed".to_string(),
            secs: 60,
        });
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.error_code(), 2002);
    }

    #[test]
    fn missing_source_is_bad_gateway() {
        let err = TrackerError::from(FetchError::MissingSource {
            tournament: "Nowhere".to_string(),
            feed: "events",
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), 2003);
    }

    #[test]
    fn invalid_request_is_bad_request() {
        let err = TrackerError::InvalidRequest("empty tournament".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn persistence_is_server_error() {
        let err = TrackerError::from(StoreError::InvalidKey(String::new()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }
}
