//! Catalogs Resource
//!
//! A catalog is the top-level container a user owns. Every action is
//! guarded: creation checks the global grant, mutation the private grant,
//! reads the public grant.

mod handlers;

use axum::{routing::get, Router};

use crate::access::ResourcePolicy;
use crate::api::AppState;

/// Resource kind key for catalogs.
pub const KIND: &str = "catalogs";
/// Right name covering the catalogs kind.
pub const RIGHT: &str = "catalogs_right";

/// Access policy for the catalogs kind.
#[must_use]
pub const fn policy() -> ResourcePolicy {
    ResourcePolicy::guarded(KIND, RIGHT)
}

/// Create catalogs router.
///
/// Routes:
/// - GET /catalogs - List catalogs
/// - GET /catalogs/{catalog_id} - Get a catalog (owner derived from the document)
/// - GET /owner/{user_id}/catalogs - List an owner's catalogs
/// - POST /owner/{user_id}/catalogs - Create a catalog for an owner
/// - GET /owner/{user_id}/catalogs/{catalog_id} - Get an owner's catalog
/// - PUT /owner/{user_id}/catalogs/{catalog_id} - Update an owner's catalog
/// - DELETE /owner/{user_id}/catalogs/{catalog_id} - Deactivate an owner's catalog
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalogs", get(handlers::list_catalogs))
        .route("/catalogs/{catalog_id}", get(handlers::get_catalog))
        .route(
            "/owner/{user_id}/catalogs",
            get(handlers::list_catalogs_by_owner).post(handlers::create_catalog),
        )
        .route(
            "/owner/{user_id}/catalogs/{catalog_id}",
            get(handlers::get_catalog_by_owner)
                .put(handlers::update_catalog)
                .delete(handlers::delete_catalog),
        )
}
