//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod error;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    access::PolicyRegistry,
    auth, catalog, category,
    config::Config,
    product, users,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// Access policies, one per protected resource kind
    pub policies: Arc<PolicyRegistry>,
}

impl AppState {
    /// Create new application state.
    ///
    /// The policy registry is assembled here from the per-resource
    /// configurations, once, and shared by reference from then on.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        let policies = PolicyRegistry::new([
            users::policy(),
            catalog::policy(),
            category::policy(),
            product::policy(),
        ]);

        Self {
            db,
            config: Arc::new(config),
            policies: Arc::new(policies),
        }
    }
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: i64,
}

#[allow(clippy::missing_const_for_fn)]
fn default_limit() -> i64 {
    50
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .nest("/auth", auth::router())
        // Users (profile + rights administration)
        .merge(users::router())
        // Storefront resources; each router carries its /owner/... variants
        .merge(catalog::router())
        .merge(category::router())
        .merge(product::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
