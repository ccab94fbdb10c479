//! Users Resource
//!
//! Profile reads/updates and rights administration. The users kind is
//! guarded like any other resource; rights routes are additionally checked
//! at global scope.

mod handlers;

use axum::{
    routing::{get, put},
    Router,
};

use crate::access::{Action, ResourcePolicy};
use crate::api::AppState;
use crate::db::Right;

/// Resource kind key for users.
pub const KIND: &str = "users";
/// Right name covering the users kind.
pub const RIGHT: &str = "users_right";

/// Access policy for the users kind: every action guarded, default scopes.
#[must_use]
pub const fn policy() -> ResourcePolicy {
    ResourcePolicy::guarded(KIND, RIGHT)
}

/// Rights every new user starts with.
///
/// Owners get full control of their own storefront entities and can read
/// everyone's public side; third parties only get public reads. Users can
/// see and edit themselves but not administer rights (no global bit).
#[must_use]
pub fn default_rights() -> Vec<Right> {
    let right = |resource: &str, rule: &str| Right {
        resource: resource.to_string(),
        rule: rule.to_string(),
    };

    vec![
        right(RIGHT, "011001"),
        right(crate::catalog::RIGHT, "111001"),
        right(crate::category::RIGHT, "111001"),
        right(crate::product::RIGHT, "111001"),
    ]
}

/// Create users router.
///
/// Routes:
/// - GET /users - List users
/// - GET /users/{user_id} - Get a user
/// - PUT /users/{user_id}/profile - Update display name / profile fields
/// - GET /users/{user_id}/rights - List a user's rights
/// - PUT /users/{user_id}/rights/{right} - Replace one right entry
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/{user_id}", get(handlers::get_user))
        .route("/users/{user_id}/profile", put(handlers::update_profile))
        .route("/users/{user_id}/rights", get(handlers::get_rights))
        .route(
            "/users/{user_id}/rights/{right}",
            put(handlers::update_right),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Rule;

    #[test]
    fn test_default_rights_cover_every_kind_once() {
        let rights = default_rights();
        let mut resources: Vec<&str> = rights.iter().map(|r| r.resource.as_str()).collect();
        resources.sort_unstable();
        resources.dedup();
        assert_eq!(resources.len(), rights.len(), "duplicate right entry");
        assert!(rights.iter().any(|r| r.resource == RIGHT));
        assert!(rights.iter().any(|r| r.resource == crate::catalog::RIGHT));
    }

    #[test]
    fn test_default_rights_decode() {
        for right in default_rights() {
            let rule = Rule::decode(&right.rule).expect("default rule must decode");
            // Third parties never get more than public reads by default.
            assert!(!rule.other.global);
            assert!(!rule.other.private);
        }
    }

    #[test]
    fn test_default_users_rule_denies_self_administration() {
        let rights = default_rights();
        let users = rights.iter().find(|r| r.resource == RIGHT).unwrap();
        let rule = Rule::decode(&users.rule).unwrap();
        assert!(!rule.own.global);
        assert!(rule.own.private);
        assert!(rule.own.public);
    }
}
