//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// User model.
///
/// `issued_tokens` is the ordered, duplicate-free sequence of live session
/// tokens; `rights` holds exactly one entry per protected resource kind.
/// `version` guards every read-modify-write of the document.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub issued_tokens: Vec<String>,
    pub rights: Json<Vec<Right>>,
    pub profile: Json<Vec<UserAttribute>>,
    pub properties: Json<Vec<UserAttribute>>,
    pub version: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Permission entry for one resource kind.
///
/// `rule` is the encoded 6-character grant string; see the access module for
/// the codec. Absence of an entry for a kind means default-deny.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Right {
    /// Right name the entry covers (e.g. `catalogs_right`).
    pub resource: String,
    /// Encoded rule string.
    pub rule: String,
}

/// Key/value entry inside a user's profile or properties list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttribute {
    pub key: String,
    pub value: serde_json::Value,
}

impl UserAttribute {
    /// Attribute with a JSON value.
    #[must_use]
    pub fn new(key: &str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Default properties seeded at registration.
#[must_use]
pub fn default_properties() -> Vec<UserAttribute> {
    vec![UserAttribute::new("banned", false)]
}

/// Catalog model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Catalog {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub catalog_id: Uuid,
    pub owner_id: Uuid,
    /// Parent category for nesting; `None` at the catalog root.
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
