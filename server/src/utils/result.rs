//! Application result type

use super::AppError;

/// Result type used by API handlers and services
pub type AppResult<T> = Result<T, AppError>;
