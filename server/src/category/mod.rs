//! Categories Resource
//!
//! Categories partition a catalog and may nest through a parent reference.
//! Every action is guarded under the default scope mapping.

mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::access::ResourcePolicy;
use crate::api::AppState;

/// Resource kind key for categories.
pub const KIND: &str = "categories";
/// Right name covering the categories kind.
pub const RIGHT: &str = "categories_right";

/// Access policy for the categories kind.
#[must_use]
pub const fn policy() -> ResourcePolicy {
    ResourcePolicy::guarded(KIND, RIGHT)
}

/// Create categories router.
///
/// Routes:
/// - GET /categories - List categories
/// - GET /categories/{category_id} - Get a category (owner derived from the document)
/// - GET /owner/{user_id}/categories - List an owner's categories
/// - POST /owner/{user_id}/catalogs/{catalog_id}/categories - Create a category
/// - PUT /owner/{user_id}/categories/{category_id} - Update an owner's category
/// - DELETE /owner/{user_id}/categories/{category_id} - Deactivate an owner's category
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(handlers::list_categories))
        .route("/categories/{category_id}", get(handlers::get_category))
        .route(
            "/owner/{user_id}/categories",
            get(handlers::list_categories_by_owner),
        )
        .route(
            "/owner/{user_id}/catalogs/{catalog_id}/categories",
            post(handlers::create_category),
        )
        .route(
            "/owner/{user_id}/categories/{category_id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
}
