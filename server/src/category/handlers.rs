//! Category HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::access::{authorize, Action};
use crate::api::error::{ApiError, ApiResult};
use crate::api::{AppState, PaginationParams};
use crate::auth::BearerToken;
use crate::db::{self, Category};

use super::KIND;

/// Category creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Short machine-friendly name.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Human-readable title.
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    /// Optional description.
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    /// Optional parent category for nesting.
    pub parent_id: Option<Uuid>,
}

/// Category update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 128))]
    pub title: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// List categories.
///
/// GET /categories
#[tracing::instrument(skip(state, token))]
pub async fn list_categories(
    State(state): State<AppState>,
    token: BearerToken,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<Category>>> {
    authorize(&state, token.as_deref(), KIND, Action::List, None).await?;

    let categories = db::list_categories(&state.db, params.limit, params.offset).await?;
    Ok(Json(categories))
}

/// Get a category by its own ID.
///
/// GET /categories/{category_id}
#[tracing::instrument(skip(state, token))]
pub async fn get_category(
    State(state): State<AppState>,
    token: BearerToken,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Json<Category>> {
    let category = db::find_category_by_id(&state.db, category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Read,
        Some(category.owner_id),
    )
    .await?;

    Ok(Json(category))
}

/// List an owner's categories.
///
/// GET /owner/{user_id}/categories
#[tracing::instrument(skip(state, token))]
pub async fn list_categories_by_owner(
    State(state): State<AppState>,
    token: BearerToken,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<Category>>> {
    authorize(&state, token.as_deref(), KIND, Action::List, Some(user_id)).await?;

    let categories =
        db::list_categories_by_owner(&state.db, user_id, params.limit, params.offset).await?;
    Ok(Json(categories))
}

/// Create a category inside an owner's catalog.
///
/// POST /owner/{user_id}/catalogs/{catalog_id}/categories
#[tracing::instrument(skip(state, token, body), fields(name = %body.name))]
pub async fn create_category(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, catalog_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Create,
        Some(user_id),
    )
    .await?;

    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    // The containing catalog must exist and belong to the addressed owner.
    db::find_catalog_by_owner_and_id(&state.db, user_id, catalog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Catalog not found".to_string()))?;

    if let Some(parent_id) = body.parent_id {
        let parent = db::find_category_by_owner_and_id(&state.db, user_id, parent_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Parent category not found".to_string()))?;
        if parent.catalog_id != catalog_id {
            return Err(ApiError::Validation(
                "Parent category belongs to a different catalog".to_string(),
            ));
        }
    }

    let category = db::create_category(
        &state.db,
        catalog_id,
        user_id,
        body.parent_id,
        &body.name,
        &body.title,
        body.description.as_deref(),
    )
    .await?;

    tracing::info!(category_id = %category.id, catalog_id = %catalog_id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// Update an owner's category.
///
/// PUT /owner/{user_id}/categories/{category_id}
#[tracing::instrument(skip(state, token, body))]
pub async fn update_category(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<Category>> {
    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Update,
        Some(user_id),
    )
    .await?;

    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let category = db::update_category(
        &state.db,
        user_id,
        category_id,
        body.title.as_deref(),
        body.description.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    tracing::info!(category_id = %category.id, "Category updated");

    Ok(Json(category))
}

/// Deactivate an owner's category (soft delete).
///
/// DELETE /owner/{user_id}/categories/{category_id}
#[tracing::instrument(skip(state, token))]
pub async fn delete_category(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Category>> {
    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Delete,
        Some(user_id),
    )
    .await?;

    let category = db::deactivate_category(&state.db, user_id, category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    tracing::info!(category_id = %category.id, "Category deactivated");

    Ok(Json(category))
}
