//! Products Resource
//!
//! Products are the storefront's public face: list and read are deliberately
//! unguarded so anonymous browsing works, while create/update/delete stay
//! guarded and owner-scoped.

mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::access::{Action, ResourcePolicy};
use crate::api::AppState;

/// Resource kind key for products.
pub const KIND: &str = "products";
/// Right name covering the products kind.
pub const RIGHT: &str = "products_right";

/// Access policy for the products kind: public browsing, guarded writes.
#[must_use]
pub const fn policy() -> ResourcePolicy {
    ResourcePolicy::guarded(KIND, RIGHT)
        .unguard(Action::List)
        .unguard(Action::Read)
}

/// Create products router.
///
/// Routes:
/// - GET /products - List products (public)
/// - GET /products/{product_id} - Get a product (public)
/// - GET /owner/{user_id}/products - List an owner's products (public)
/// - POST /owner/{user_id}/categories/{category_id}/products - Create a product
/// - PUT /owner/{user_id}/products/{product_id} - Update an owner's product
/// - DELETE /owner/{user_id}/products/{product_id} - Deactivate an owner's product
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product))
        .route(
            "/owner/{user_id}/products",
            get(handlers::list_products_by_owner),
        )
        .route(
            "/owner/{user_id}/categories/{category_id}/products",
            post(handlers::create_product),
        )
        .route(
            "/owner/{user_id}/products/{product_id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
}
