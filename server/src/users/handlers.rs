//! Users HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{authorize, authorize_scoped, validate_encoded_rule, Action, Scope};
use crate::api::error::{ApiError, ApiResult};
use crate::api::{AppState, PaginationParams};
use crate::auth::{BearerToken, UserProfile};
use crate::db::{
    find_user_by_id, list_users as query_list_users, update_user_profile, update_user_rights,
    Right, UserAttribute,
};

use super::KIND;

/// Attempt budget for version-conditioned rights updates.
const MAX_SAVE_ATTEMPTS: u32 = 3;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Profile update request.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub display_name: Option<String>,
    /// Replacement profile field list.
    pub profile: Option<Vec<UserAttribute>>,
}

/// Right update request.
#[derive(Debug, Deserialize)]
pub struct UpdateRightRequest {
    /// Encoded 6-character rule string.
    pub rule: String,
}

/// A user's rights set.
#[derive(Debug, Serialize)]
pub struct RightsResponse {
    /// Right entries, one per resource kind.
    pub rights: Vec<Right>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List users.
///
/// GET /users
#[tracing::instrument(skip(state, token))]
pub async fn list_users(
    State(state): State<AppState>,
    token: BearerToken,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    authorize(&state, token.as_deref(), KIND, Action::List, None).await?;

    let users = query_list_users(&state.db, params.limit, params.offset).await?;
    Ok(Json(users.iter().map(UserProfile::from).collect()))
}

/// Get a user by ID.
///
/// GET /users/{user_id}
#[tracing::instrument(skip(state, token))]
pub async fn get_user(
    State(state): State<AppState>,
    token: BearerToken,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserProfile>> {
    authorize(&state, token.as_deref(), KIND, Action::Read, Some(user_id)).await?;

    let user = find_user_by_id(&state.db, user_id)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserProfile::from(&user)))
}

/// Update a user's display name and profile fields.
///
/// PUT /users/{user_id}/profile
#[tracing::instrument(skip(state, token, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    token: BearerToken,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    authorize(&state, token.as_deref(), KIND, Action::Update, Some(user_id)).await?;

    let user = update_user_profile(
        &state.db,
        user_id,
        body.display_name.as_deref(),
        body.profile.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user_id, "Profile updated");

    Ok(Json(UserProfile::from(&user)))
}

/// List a user's rights.
///
/// Rights expose what a user may do, so reading them is checked at global
/// scope rather than the read default.
///
/// GET /users/{user_id}/rights
#[tracing::instrument(skip(state, token))]
pub async fn get_rights(
    State(state): State<AppState>,
    token: BearerToken,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<RightsResponse>> {
    authorize_scoped(
        &state,
        token.as_deref(),
        KIND,
        Action::Read,
        Some(Scope::Global),
        Some(user_id),
    )
    .await?;

    let user = find_user_by_id(&state.db, user_id)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(RightsResponse {
        rights: user.rights.0,
    }))
}

/// Replace one right entry in a user's rights set.
///
/// The rule is structurally validated before anything is written; a
/// malformed rule is rejected, never guessed at. The rights set keeps
/// exactly one entry per resource kind.
///
/// PUT /users/{user_id}/rights/{right}
#[tracing::instrument(skip(state, token, body), fields(right = %right))]
pub async fn update_right(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, right)): Path<(Uuid, String)>,
    Json(body): Json<UpdateRightRequest>,
) -> ApiResult<Json<RightsResponse>> {
    authorize_scoped(
        &state,
        token.as_deref(),
        KIND,
        Action::Update,
        Some(Scope::Global),
        Some(user_id),
    )
    .await?;

    if !state.policies.knows_right(&right) {
        return Err(ApiError::NotFound(format!("Unknown right: {right}")));
    }

    validate_encoded_rule(&body.rule).map_err(|e| ApiError::Validation(e.to_string()))?;

    for _ in 0..MAX_SAVE_ATTEMPTS {
        let user = find_user_by_id(&state.db, user_id)
            .await?
            .filter(|u| u.active)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let mut rights = user.rights.0.clone();
        match rights.iter_mut().find(|r| r.resource == right) {
            Some(entry) => entry.rule.clone_from(&body.rule),
            None => rights.push(Right {
                resource: right.clone(),
                rule: body.rule.clone(),
            }),
        }

        if update_user_rights(&state.db, user_id, &rights, user.version).await? {
            tracing::info!(user_id = %user_id, "Right updated");
            return Ok(Json(RightsResponse { rights }));
        }

        tracing::warn!(user_id = %user_id, "Rights update lost a version race, retrying");
    }

    Err(ApiError::Conflict)
}
