//! Access-control error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::policy::Action;

/// Outcome of a denied or failed authorization check.
///
/// Denials carry the attempted action and resource kind for observability,
/// but never the caller's actual grant bits.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Caller may not create entities of this kind.
    #[error("Has no access to create {kind}")]
    CanNotCreate {
        /// Resource kind the check ran against.
        kind: &'static str,
    },

    /// Caller may not read entities of this kind.
    #[error("Has no access to read {kind}")]
    CanNotRead { kind: &'static str },

    /// Caller may not update entities of this kind.
    #[error("Has no access to update {kind}")]
    CanNotUpdate { kind: &'static str },

    /// Caller may not delete entities of this kind.
    #[error("Has no access to delete {kind}")]
    CanNotDelete { kind: &'static str },

    /// Resource kind has no registered policy.
    #[error("Unknown resource kind")]
    UnknownResource,

    /// Database error during rule resolution.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl AccessError {
    /// Denial for the given action against the given kind.
    #[must_use]
    pub const fn denied(action: Action, kind: &'static str) -> Self {
        match action {
            Action::Create => Self::CanNotCreate { kind },
            Action::List | Action::Read => Self::CanNotRead { kind },
            Action::Update => Self::CanNotUpdate { kind },
            Action::Delete => Self::CanNotDelete { kind },
        }
    }
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Machine-readable error code.
    error: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::CanNotCreate { .. } => (StatusCode::FORBIDDEN, "CAN_NOT_CREATE"),
            Self::CanNotRead { .. } => (StatusCode::FORBIDDEN, "CAN_NOT_READ"),
            Self::CanNotUpdate { .. } => (StatusCode::FORBIDDEN, "CAN_NOT_UPDATE"),
            Self::CanNotDelete { .. } => (StatusCode::FORBIDDEN, "CAN_NOT_DELETE"),
            Self::UnknownResource => (StatusCode::NOT_FOUND, "UNKNOWN_RESOURCE"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
