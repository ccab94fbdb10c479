//! Product HTTP Handlers

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
use crate::db::{self, Product};

use super::KIND;

/// Product creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Short machine-friendly name.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Human-readable title.
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    /// Optional description.
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    /// Price in cents.
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

/// Product update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 128))]
    pub title: Option<String>,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
}

/// List products.
///
/// List is unguarded for products; the dispatcher allows it without a rule.
///
/// GET /products
#[tracing::instrument(skip(state, token))]
pub async fn list_products(
    State(state): State<AppState>,
    token: BearerToken,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<Product>>> {
    authorize(&state, token.as_deref(), KIND, Action::List, None).await?;

    let products = db::list_products(&state.db, params.limit, params.offset).await?;
    Ok(Json(products))
}

/// Get a product by its own ID.
///
/// GET /products/{product_id}
#[tracing::instrument(skip(state, token))]
pub async fn get_product(
    State(state): State<AppState>,
    token: BearerToken,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    let product = db::find_product_by_id(&state.db, product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Read,
        Some(product.owner_id),
    )
    .await?;

    Ok(Json(product))
}

/// List an owner's products.
///
/// GET /owner/{user_id}/products
#[tracing::instrument(skip(state, token))]
pub async fn list_products_by_owner(
    State(state): State<AppState>,
    token: BearerToken,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<Vec<Product>>> {
    authorize(&state, token.as_deref(), KIND, Action::List, Some(user_id)).await?;

    let products =
        db::list_products_by_owner(&state.db, user_id, params.limit, params.offset).await?;
    Ok(Json(products))
}

/// Create a product inside an owner's category.
///
/// POST /owner/{user_id}/categories/{category_id}/products
#[tracing::instrument(skip(state, token, body), fields(name = %body.name))]
pub async fn create_product(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
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

    // The containing category must exist and belong to the addressed owner.
    db::find_category_by_owner_and_id(&state.db, user_id, category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let product = db::create_product(
        &state.db,
        category_id,
        user_id,
        &body.name,
        &body.title,
        body.description.as_deref(),
        body.price_cents,
    )
    .await?;

    tracing::info!(product_id = %product.id, category_id = %category_id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update an owner's product.
///
/// PUT /owner/{user_id}/products/{product_id}
#[tracing::instrument(skip(state, token, body))]
pub async fn update_product(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, product_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateProductRequest>,
) -> ApiResult<Json<Product>> {
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

    let product = db::update_product(
        &state.db,
        user_id,
        product_id,
        body.title.as_deref(),
        body.description.as_deref(),
        body.price_cents,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    tracing::info!(product_id = %product.id, "Product updated");

    Ok(Json(product))
}

/// Deactivate an owner's product (soft delete).
///
/// DELETE /owner/{user_id}/products/{product_id}
#[tracing::instrument(skip(state, token))]
pub async fn delete_product(
    State(state): State<AppState>,
    token: BearerToken,
    Path((user_id, product_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Product>> {
    authorize(
        &state,
        token.as_deref(),
        KIND,
        Action::Delete,
        Some(user_id),
    )
    .await?;

    let product = db::deactivate_product(&state.db, user_id, product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    tracing::info!(product_id = %product.id, "Product deactivated");

    Ok(Json(product))
}
