//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.
//! Domain deletes are soft: `deactivate_*` flips the `active` flag and
//! nothing here issues a raw `DELETE` against a domain table.

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::models::{default_properties, Catalog, Category, Product, Right, User, UserAttribute};

/// Log and return a database error with context.
///
/// This helper ensures all database errors are logged with relevant context
/// before being propagated, making production debugging easier.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

// ============================================================================
// User Queries
// ============================================================================

/// Find user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_id", user_id = %id))
}

/// Find user by username.
pub async fn find_user_by_username(pool: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_username", username = %username))
}

/// Check if username exists.
pub async fn username_exists(pool: &PgPool, username: &str) -> sqlx::Result<bool> {
    let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(result.0)
}

/// Check if email exists.
pub async fn email_exists(pool: &PgPool, email: &str) -> sqlx::Result<bool> {
    let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(result.0)
}

/// Create a new user with default profile and properties, the given rights
/// set, and an empty issued-token sequence.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    display_name: &str,
    email: Option<&str>,
    password_hash: &str,
    rights: &[Right],
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r"
        INSERT INTO users (username, display_name, email, password_hash, rights, profile, properties)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        ",
    )
    .bind(username)
    .bind(display_name)
    .bind(email)
    .bind(password_hash)
    .bind(Json(rights))
    .bind(Json(Vec::<UserAttribute>::new()))
    .bind(Json(default_properties()))
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_user", username = %username))
}

/// Replace a user's issued-token sequence, conditioned on the version read
/// alongside it.
///
/// Returns `false` when another writer got there first; the caller re-reads
/// and retries. This is the only way the token sequence is ever written.
pub async fn update_user_tokens(
    pool: &PgPool,
    id: Uuid,
    tokens: &[String],
    expected_version: i64,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r"
        UPDATE users
        SET issued_tokens = $2, version = version + 1, updated_at = NOW()
        WHERE id = $1 AND version = $3
        ",
    )
    .bind(id)
    .bind(tokens)
    .bind(expected_version)
    .execute(pool)
    .await
    .map_err(db_error!("update_user_tokens", user_id = %id))?;

    Ok(result.rows_affected() == 1)
}

/// Replace a user's rights set, conditioned on the version read alongside it.
pub async fn update_user_rights(
    pool: &PgPool,
    id: Uuid,
    rights: &[Right],
    expected_version: i64,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r"
        UPDATE users
        SET rights = $2, version = version + 1, updated_at = NOW()
        WHERE id = $1 AND version = $3
        ",
    )
    .bind(id)
    .bind(Json(rights))
    .bind(expected_version)
    .execute(pool)
    .await
    .map_err(db_error!("update_user_rights", user_id = %id))?;

    Ok(result.rows_affected() == 1)
}

/// Update a user's password hash.
pub async fn update_user_password(pool: &PgPool, id: Uuid, password_hash: &str) -> sqlx::Result<()> {
    sqlx::query(
        r"
        UPDATE users
        SET password_hash = $2, version = version + 1, updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(db_error!("update_user_password", user_id = %id))?;

    Ok(())
}

/// Update a user's display name and profile list.
pub async fn update_user_profile(
    pool: &PgPool,
    id: Uuid,
    display_name: Option<&str>,
    profile: Option<&[UserAttribute]>,
) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r"
        UPDATE users
        SET display_name = COALESCE($2, display_name),
            profile = COALESCE($3, profile),
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(id)
    .bind(display_name)
    .bind(profile.map(Json))
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_user_profile", user_id = %id))
}

/// List users.
pub async fn list_users(pool: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE active = TRUE ORDER BY username LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_users", limit = limit, offset = offset))
}

// ============================================================================
// Catalog Queries
// ============================================================================

/// Create a catalog for an owner.
pub async fn create_catalog(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    title: &str,
    description: Option<&str>,
) -> sqlx::Result<Catalog> {
    sqlx::query_as::<_, Catalog>(
        r"
        INSERT INTO catalogs (owner_id, name, title, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        ",
    )
    .bind(owner_id)
    .bind(name)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_catalog", owner_id = %owner_id))
}

/// Find an active catalog by ID.
pub async fn find_catalog_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Catalog>> {
    sqlx::query_as::<_, Catalog>("SELECT * FROM catalogs WHERE id = $1 AND active = TRUE")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_catalog_by_id", catalog_id = %id))
}

/// Find an active catalog by owner and ID.
pub async fn find_catalog_by_owner_and_id(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Catalog>> {
    sqlx::query_as::<_, Catalog>(
        "SELECT * FROM catalogs WHERE id = $1 AND owner_id = $2 AND active = TRUE",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_catalog_by_owner_and_id", catalog_id = %id, owner_id = %owner_id))
}

/// List active catalogs.
pub async fn list_catalogs(pool: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<Catalog>> {
    sqlx::query_as::<_, Catalog>(
        "SELECT * FROM catalogs WHERE active = TRUE ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_catalogs", limit = limit, offset = offset))
}

/// List active catalogs belonging to an owner.
pub async fn list_catalogs_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Catalog>> {
    sqlx::query_as::<_, Catalog>(
        r"
        SELECT * FROM catalogs
        WHERE owner_id = $1 AND active = TRUE
        ORDER BY created_at LIMIT $2 OFFSET $3
        ",
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_catalogs_by_owner", owner_id = %owner_id))
}

/// Update an owner's catalog.
pub async fn update_catalog(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> sqlx::Result<Option<Catalog>> {
    sqlx::query_as::<_, Catalog>(
        r"
        UPDATE catalogs
        SET title = COALESCE($3, title),
            description = COALESCE($4, description),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2 AND active = TRUE
        RETURNING *
        ",
    )
    .bind(id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_catalog", catalog_id = %id, owner_id = %owner_id))
}

/// Soft-delete an owner's catalog.
pub async fn deactivate_catalog(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Catalog>> {
    sqlx::query_as::<_, Catalog>(
        r"
        UPDATE catalogs
        SET active = FALSE, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2 AND active = TRUE
        RETURNING *
        ",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("deactivate_catalog", catalog_id = %id, owner_id = %owner_id))
}

// ============================================================================
// Category Queries
// ============================================================================

/// Create a category inside a catalog.
pub async fn create_category(
    pool: &PgPool,
    catalog_id: Uuid,
    owner_id: Uuid,
    parent_id: Option<Uuid>,
    name: &str,
    title: &str,
    description: Option<&str>,
) -> sqlx::Result<Category> {
    sqlx::query_as::<_, Category>(
        r"
        INSERT INTO categories (catalog_id, owner_id, parent_id, name, title, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(catalog_id)
    .bind(owner_id)
    .bind(parent_id)
    .bind(name)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_category", catalog_id = %catalog_id, owner_id = %owner_id))
}

/// Find an active category by ID.
pub async fn find_category_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 AND active = TRUE")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_category_by_id", category_id = %id))
}

/// Find an active category by owner and ID.
pub async fn find_category_by_owner_and_id(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE id = $1 AND owner_id = $2 AND active = TRUE",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_category_by_owner_and_id", category_id = %id, owner_id = %owner_id))
}

/// List active categories.
pub async fn list_categories(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE active = TRUE ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_categories", limit = limit, offset = offset))
}

/// List active categories belonging to an owner.
pub async fn list_categories_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r"
        SELECT * FROM categories
        WHERE owner_id = $1 AND active = TRUE
        ORDER BY created_at LIMIT $2 OFFSET $3
        ",
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_categories_by_owner", owner_id = %owner_id))
}

/// Update an owner's category.
pub async fn update_category(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r"
        UPDATE categories
        SET title = COALESCE($3, title),
            description = COALESCE($4, description),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2 AND active = TRUE
        RETURNING *
        ",
    )
    .bind(id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_category", category_id = %id, owner_id = %owner_id))
}

/// Soft-delete an owner's category.
pub async fn deactivate_category(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r"
        UPDATE categories
        SET active = FALSE, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2 AND active = TRUE
        RETURNING *
        ",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("deactivate_category", category_id = %id, owner_id = %owner_id))
}

// ============================================================================
// Product Queries
// ============================================================================

/// Create a product inside a category.
pub async fn create_product(
    pool: &PgPool,
    category_id: Uuid,
    owner_id: Uuid,
    name: &str,
    title: &str,
    description: Option<&str>,
    price_cents: i64,
) -> sqlx::Result<Product> {
    sqlx::query_as::<_, Product>(
        r"
        INSERT INTO products (category_id, owner_id, name, title, description, price_cents)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(category_id)
    .bind(owner_id)
    .bind(name)
    .bind(title)
    .bind(description)
    .bind(price_cents)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_product", category_id = %category_id, owner_id = %owner_id))
}

/// Find an active product by ID.
pub async fn find_product_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND active = TRUE")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_product_by_id", product_id = %id))
}

/// Find an active product by owner and ID.
pub async fn find_product_by_owner_and_id(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = $1 AND owner_id = $2 AND active = TRUE",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_product_by_owner_and_id", product_id = %id, owner_id = %owner_id))
}

/// List active products.
pub async fn list_products(pool: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<Product>> {
    sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE active = TRUE ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_products", limit = limit, offset = offset))
}

/// List active products belonging to an owner.
pub async fn list_products_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Product>> {
    sqlx::query_as::<_, Product>(
        r"
        SELECT * FROM products
        WHERE owner_id = $1 AND active = TRUE
        ORDER BY created_at LIMIT $2 OFFSET $3
        ",
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_products_by_owner", owner_id = %owner_id))
}

/// Update an owner's product.
pub async fn update_product(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    price_cents: Option<i64>,
) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>(
        r"
        UPDATE products
        SET title = COALESCE($3, title),
            description = COALESCE($4, description),
            price_cents = COALESCE($5, price_cents),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2 AND active = TRUE
        RETURNING *
        ",
    )
    .bind(id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(price_cents)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("update_product", product_id = %id, owner_id = %owner_id))
}

/// Soft-delete an owner's product.
pub async fn deactivate_product(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>(
        r"
        UPDATE products
        SET active = FALSE, updated_at = NOW()
        WHERE id = $1 AND owner_id = $2 AND active = TRUE
        RETURNING *
        ",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("deactivate_product", product_id = %id, owner_id = %owner_id))
}
