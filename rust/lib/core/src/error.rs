use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. The CLI and the HTTP client
// rebuild a `ServiceError` from these, never from the message text.

/// Stable error code constants.
///
/// Responses look like `{"code": "NOT_FOUND", "message": "..."}`.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error shared by the storage layer, the HTTP routers
/// and the record components.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code:
///
/// ```json
/// {"code": "NOT_FOUND", "message": "Agent '3f2a…' not found"}
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Record does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate id. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Input data is invalid. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid session. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Storage backend failure (disk, network, quota). HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Rebuild an error from its wire form. Unknown codes become `Internal`.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            error_code::NOT_FOUND => ServiceError::NotFound(message),
            error_code::ALREADY_EXISTS => ServiceError::Conflict(message),
            error_code::VALIDATION_FAILED => ServiceError::Validation(message),
            error_code::UNAUTHENTICATED => ServiceError::Unauthorized(message),
            error_code::STORAGE_ERROR => ServiceError::Storage(message),
            _ => ServiceError::Internal(message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
