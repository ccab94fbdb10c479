//! Rule resolution.
//!
//! Looks up the caller's right entry for a resource kind and decodes it.
//! Absence of an identity, an unknown user, or a missing right entry all
//! resolve to `None` (default-deny, never an error). The requested action is
//! not consulted here; one right covers every action of a kind and the
//! dispatcher picks the scope flag downstream.

use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db::{find_user_by_id, Right};

use super::rule::Rule;

/// Find the right entry for a resource kind inside a rights set.
#[must_use]
pub fn find_right<'a>(rights: &'a [Right], right: &str) -> Option<&'a Right> {
    rights.iter().find(|r| r.resource == right)
}

/// Resolve the decoded rule a user holds for a right name.
///
/// Returns `Ok(None)` when the caller is anonymous, unknown, or holds no
/// right for the kind. A stored rule that fails structural decoding is
/// logged and treated as no rule; the write path rejects malformed rules,
/// so this only fires on data corruption.
pub async fn resolve_rule(
    pool: &PgPool,
    user_id: Option<Uuid>,
    right: &str,
) -> sqlx::Result<Option<Rule>> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let Some(user) = find_user_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    let Some(entry) = find_right(&user.rights, right) else {
        return Ok(None);
    };

    match Rule::decode(&entry.rule) {
        Ok(rule) => Ok(Some(rule)),
        Err(e) => {
            error!(user_id = %user_id, right = %right, error = %e, "Stored rule failed to decode");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rights() -> Vec<Right> {
        vec![
            Right {
                resource: "catalogs_right".to_string(),
                rule: "111000".to_string(),
            },
            Right {
                resource: "products_right".to_string(),
                rule: "011001".to_string(),
            },
        ]
    }

    #[test]
    fn test_find_right_present() {
        let rights = rights();
        let entry = find_right(&rights, "products_right").unwrap();
        assert_eq!(entry.rule, "011001");
    }

    #[test]
    fn test_find_right_absent_is_none() {
        // Default-deny: no entry for the kind means no grant of any kind.
        let rights = rights();
        assert!(find_right(&rights, "reviews_right").is_none());
        assert!(find_right(&[], "catalogs_right").is_none());
    }
}
