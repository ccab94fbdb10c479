//! API Error Types
//!
//! Shared error type for resource handlers. Raw persistence errors never
//! cross the HTTP boundary; they map to an opaque 500 with a traced log line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::access::AccessError;
use crate::auth::AuthError;

/// Errors surfaced by resource handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Access check denied or failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Session or credential failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Addressed entity does not exist (or is deactivated).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Optimistic update lost its retry budget.
    #[error("Concurrent update conflict")]
    Conflict,

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Machine-readable error code.
    error: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Access(e) => e.into_response(),
            Self::Auth(e) => e.into_response(),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "NOT_FOUND".to_string(),
                    message,
                }),
            )
                .into_response(),
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "VALIDATION_ERROR".to_string(),
                    message,
                }),
            )
                .into_response(),
            Self::Conflict => (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "CONFLICT".to_string(),
                    message: "Concurrent update conflict".to_string(),
                }),
            )
                .into_response(),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "INTERNAL_ERROR".to_string(),
                    message: "Internal server error".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
