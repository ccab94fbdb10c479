//! Authentication Service
//!
//! Token lifecycle: issue at login, validate on every authenticated request,
//! revoke at logout, re-issue only after revocation. Sessions live in the
//! user's issued-token sequence; see [`session`] for the latch and
//! concurrency rules.

mod error;
mod extract;
mod handlers;
pub mod jwt;
mod password;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use error::{AuthError, AuthResult};
pub use extract::BearerToken;
pub use handlers::UserProfile;
pub use password::{hash_password, verify_password};

/// Create authentication router.
///
/// Routes:
/// - POST /register - Register a new user (no implicit login)
/// - POST /login - Login with username/password
/// - GET /autologin - Resume a session from a bearer token
/// - POST /logout - Revoke the presented token
/// - POST /change-password - Change password (live session required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/autologin", get(handlers::autologin))
        .route("/logout", post(handlers::logout))
        .route("/change-password", post(handlers::change_password))
}
