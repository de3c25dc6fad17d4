//! Unified error handling
//!
//! Application error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error code scheme
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | Business errors | E0003 not found |
//! | E2xxx  | Permission errors | E2001 forbidden |
//! | E9xxx  | System errors | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 on success)
    pub code: String,
    /// Message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business errors (4xx) ==========
    #[error("Resource not found: {0}")]
    /// Missing resource (404)
    NotFound(String),

    #[error("Validation failed: {0}")]
    /// Malformed input (400)
    Validation(String),

    #[error("Invalid state: {0}")]
    /// Structurally incomplete record, e.g. order without items (400)
    InvalidState(String),

    #[error("Already settled: {0}")]
    /// Settlement idempotency guard tripped (400)
    AlreadySettled(String),

    #[error("Concurrent modification: {0}")]
    /// Record changed under a racing request (409)
    ConcurrentModification(String),

    #[error("Insufficient funds: {0}")]
    /// Wallet debit would overdraw the balance (400)
    InsufficientFunds(String),

    #[error("Permission denied: {0}")]
    /// Actor not allowed to mutate this record (403)
    Forbidden(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    /// Storage layer failure (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// Anything else (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, "E0005", msg.as_str()),
            AppError::AlreadySettled(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),
            AppError::ConcurrentModification(msg) => (StatusCode::CONFLICT, "E0007", msg.as_str()),
            AppError::InsufficientFunds(msg) => (StatusCode::BAD_REQUEST, "E0008", msg.as_str()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),

            // 5xx details are logged, not returned to the caller
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Validation(msg),
            RepoError::Locked(msg) => AppError::InvalidState(msg),
            RepoError::Conflict(msg) => AppError::ConcurrentModification(msg),
            RepoError::InsufficientFunds(msg) => AppError::InsufficientFunds(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let response = AppResponse {
            code: "E0000".to_string(),
            message: "Success".to_string(),
            data: Some(42),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "E0000");
        assert_eq!(json["message"], "Success");
        assert_eq!(json["data"], 42);
    }

    #[test]
    fn error_envelope_omits_data() {
        let response = AppResponse::<()> {
            code: "E0003".to_string(),
            message: "Resource not found".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn repo_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(RepoError::NotFound("x".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::Locked("x".into())),
            AppError::InvalidState(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::Conflict("x".into())),
            AppError::ConcurrentModification(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::InsufficientFunds("x".into())),
            AppError::InsufficientFunds(_)
        ));
    }
}
