//! Authentication HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::AppState;
use crate::db::{
    create_user, email_exists, find_user_by_username, update_user_password, username_exists, User,
};
use crate::users::default_rights;

use super::error::{AuthError, AuthResult};
use super::extract::BearerToken;
use super::jwt::validate_token;
use super::password::{hash_password, verify_password};
use super::session::{autologin_user, issue_token, revoke_token};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (3-32 lowercase alphanumeric + underscore).
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    /// Email address (optional).
    #[validate(email)]
    pub email: Option<String>,
    /// Password (8-128 characters).
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Display name (optional, defaults to username).
    #[validate(length(max = 64))]
    pub display_name: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Password change request.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    pub old_password: String,
    /// New password (8-128 characters).
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Safe-to-expose user fields.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    /// User ID.
    pub id: String,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// Email (if set).
    pub email: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Authentication response with the live session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Session token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// The authenticated user.
    pub user: UserProfile,
}

// ============================================================================
// Validation
// ============================================================================

/// Username validation regex (matches DB constraint).
static USERNAME_REGEX: std::sync::LazyLock<regex::Regex> =
    std::sync::LazyLock::new(|| regex::Regex::new(r"^[a-z0-9_]{3,32}$").unwrap());

// ============================================================================
// Handlers
// ============================================================================

/// Register a new user.
///
/// Creates the user with the default rights set, default profile and default
/// properties, and an empty issued-token sequence. Registration does not log
/// the user in.
///
/// POST /auth/register
#[tracing::instrument(skip(state, body), fields(username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<UserProfile>)> {
    body.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    if !USERNAME_REGEX.is_match(&body.username) {
        return Err(AuthError::Validation(
            "Username must be 3-32 lowercase alphanumeric or underscore characters".to_string(),
        ));
    }

    // Uniqueness pre-checks; the UNIQUE constraints catch races.
    if username_exists(&state.db, &body.username).await? {
        return Err(AuthError::UserAlreadyExists);
    }
    if let Some(ref email) = body.email {
        if email_exists(&state.db, email).await? {
            return Err(AuthError::UserAlreadyExists);
        }
    }

    let password_hash = hash_password(&body.password).map_err(|_| AuthError::PasswordHash)?;
    let display_name = body.display_name.as_deref().unwrap_or(&body.username);

    let user = create_user(
        &state.db,
        &body.username,
        display_name,
        body.email.as_deref(),
        &password_hash,
        &default_rights(),
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// Login with username/password.
///
/// Unknown usernames and wrong passwords produce the same failure. When the
/// user already holds an issued token it is returned as-is; a fresh token is
/// only minted into an empty sequence.
///
/// POST /auth/login
#[tracing::instrument(skip(state, body), fields(username = %body.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AuthResult<Json<AuthResponse>> {
    let user = find_user_by_username(&state.db, &body.username)
        .await?
        .filter(|u| u.active)
        .ok_or(AuthError::AuthenticationFailed)?;

    let valid = verify_password(&body.password, &user.password_hash)
        .map_err(|_| AuthError::PasswordHash)?;
    if !valid {
        return Err(AuthError::AuthenticationFailed);
    }

    let token = issue_token(
        &state.db,
        &user,
        &state.config.jwt_private_key,
        state.config.jwt_token_expiry,
    )
    .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        user: UserProfile::from(&user),
    }))
}

/// Resume a session from a bearer token.
///
/// The token must decode and be literally present in the user's issued-token
/// sequence; anything else is an anonymous request.
///
/// GET /auth/autologin
#[tracing::instrument(skip(state, token))]
pub async fn autologin(
    State(state): State<AppState>,
    token: BearerToken,
) -> AuthResult<Json<AuthResponse>> {
    let raw = token.as_deref().ok_or(AuthError::NoSession)?;

    let user = autologin_user(&state.db, raw, &state.config.jwt_public_key)
        .await?
        .ok_or(AuthError::NoSession)?;

    Ok(Json(AuthResponse {
        token: raw.to_string(),
        token_type: "Bearer".to_string(),
        user: UserProfile::from(&user),
    }))
}

/// Logout and revoke the presented token.
///
/// Revoking a token that is not in the sequence reports "nothing to revoke"
/// rather than silently succeeding.
///
/// POST /auth/logout
#[tracing::instrument(skip(state, token))]
pub async fn logout(State(state): State<AppState>, token: BearerToken) -> AuthResult<()> {
    let raw = token.as_deref().ok_or(AuthError::NoSession)?;

    let claims = validate_token(raw, &state.config.jwt_public_key)?;
    let user_id: Uuid = claims.sub.parse().map_err(|_| AuthError::NoSession)?;

    revoke_token(&state.db, user_id, raw).await?;

    tracing::info!(user_id = %user_id, "User logged out");

    Ok(())
}

/// Change the current user's password.
///
/// Requires a live session and the current password. Issued tokens survive a
/// password change; sessions are bound to the token sequence, not the hash.
///
/// POST /auth/change-password
#[tracing::instrument(skip(state, token, body))]
pub async fn change_password(
    State(state): State<AppState>,
    token: BearerToken,
    Json(body): Json<ChangePasswordRequest>,
) -> AuthResult<()> {
    body.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let raw = token.as_deref().ok_or(AuthError::NoSession)?;
    let user = autologin_user(&state.db, raw, &state.config.jwt_public_key)
        .await?
        .ok_or(AuthError::NoSession)?;

    let valid = verify_password(&body.old_password, &user.password_hash)
        .map_err(|_| AuthError::PasswordHash)?;
    if !valid {
        return Err(AuthError::AuthenticationFailed);
    }

    let password_hash = hash_password(&body.new_password).map_err(|_| AuthError::PasswordHash)?;
    update_user_password(&state.db, user.id, &password_hash).await?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(())
}
