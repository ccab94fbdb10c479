//! Catalog HTTP Handlers

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
use crate::db::{self, Catalog};

use super::KIND;

/// Catalog creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCatalogRequest {
    /// Short machine-friendly name, unique per owner.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Human-readable title.
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    /// Optional description.
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Catalog update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCatalogRequest {
    #[validate(length(min = 1, max = 128))]
    pub title: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// List catalogs.
///
/// GET /catalogs
#[tracing::instrument(skip(state, token))]
pub async fn list_catalogs(
    State(state): State<AppState>,
    token: BearerToken,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<Catalog>>> {
    authorize(&state, token.as_deref(), KIND, Action::List, None).await?;

    let catalogs = db::list_catalogs(&state.db, params.limit, params.offset).await?;
    Ok(Json(catalogs))
}

/// Get a catalog by its own ID.
///
/// The owner parameter for the access check comes from the stored owner
/// reference of the loaded document.
///
/// GET /catalogs/{catalog_id}
#[tracing::instrument(skip(state, token))]
pub async fn get_catalog(
    State(state): State<AppState>,
    token: BearerToken,
    Path(catalog_id): Path<Uuid>,
) -> ApiResult<Json<Catalog>> {
    let catalog = db::find_catalog_by_id(&state.db, catalog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Catalog not found".to_string()))?;

    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Read,
        Some(catalog.owner_id),
    )
    .await?;

    Ok(Json(catalog))
}

/// List an owner's catalogs.
///
/// GET /owner/{user_id}/catalogs
#[tracing::instrument(skip(state, token))]
pub async fn list_catalogs_by_owner(
    State(state): State<AppState>,
    token: BearerToken,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<Catalog>>> {
    authorize(&state, token.as_deref(), KIND, Action::List, Some(user_id)).await?;

    let catalogs =
        db::list_catalogs_by_owner(&state.db, user_id, params.limit, params.offset).await?;
    Ok(Json(catalogs))
}

/// Create a catalog for an owner.
///
/// POST /owner/{user_id}/catalogs
#[tracing::instrument(skip(state, token, body), fields(name = %body.name))]
pub async fn create_catalog(
    State(state): State<AppState>,
    token: BearerToken,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CreateCatalogRequest>,
) -> ApiResult<(StatusCode, Json<Catalog>)> {
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

    let catalog = db::create_catalog(
        &state.db,
        user_id,
        &body.name,
        &body.title,
        body.description.as_deref(),
    )
    .await?;

    tracing::info!(catalog_id = %catalog.id, owner_id = %user_id, "Catalog created");

    Ok((StatusCode::CREATED, Json(catalog)))
}

/// Get an owner's catalog.
///
/// GET /owner/{user_id}/catalogs/{catalog_id}
#[tracing::instrument(skip(state, token))]
pub async fn get_catalog_by_owner(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, catalog_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Catalog>> {
    authorize(&state, token.as_deref(), KIND, Action::Read, Some(user_id)).await?;

    let catalog = db::find_catalog_by_owner_and_id(&state.db, user_id, catalog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Catalog not found".to_string()))?;

    Ok(Json(catalog))
}

/// Update an owner's catalog.
///
/// PUT /owner/{user_id}/catalogs/{catalog_id}
#[tracing::instrument(skip(state, token, body))]
pub async fn update_catalog(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, catalog_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateCatalogRequest>,
) -> ApiResult<Json<Catalog>> {
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

    let catalog = db::update_catalog(
        &state.db,
        user_id,
        catalog_id,
        body.title.as_deref(),
        body.description.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Catalog not found".to_string()))?;

    tracing::info!(catalog_id = %catalog.id, "Catalog updated");

    Ok(Json(catalog))
}

/// Deactivate an owner's catalog (soft delete).
///
/// DELETE /owner/{user_id}/catalogs/{catalog_id}
#[tracing::instrument(skip(state, token))]
pub async fn delete_catalog(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, catalog_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Catalog>> {
    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Delete,
        Some(user_id),
    )
    .await?;

    let catalog = db::deactivate_catalog(&state.db, user_id, catalog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Catalog not found".to_string()))?;

    tracing::info!(catalog_id = %catalog.id, "Catalog deactivated");

    Ok(Json(catalog))
}
