//! Session Lifecycle
//!
//! Issue, validate and revoke tokens against a user's issued-token sequence.
//!
//! A user holds at most one live token at a time: login reuses the existing
//! token when one is already issued and only mints when the sequence is
//! empty (single-session latch). Validity is a two-part contract, kept
//! explicit and sequential: the token decodes to an identity, AND the raw
//! string is literally present in that user's issued-token sequence.
//!
//! Every mutation of the sequence is a compare-and-swap on the user
//! document's version, retried a bounded number of times. Exhaustion
//! surfaces [`AuthError::Conflict`]; no lost update is possible under
//! concurrent login/logout for the same user.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::db::{find_user_by_id, update_user_tokens, User};

use super::error::{AuthError, AuthResult};
use super::jwt::{generate_token, validate_token};

/// Attempt budget for version-conditioned updates of the token sequence.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Token sequence after a login, or `None` when the existing sequence
/// already holds a token and nothing must change.
#[must_use]
pub fn tokens_after_login(existing: &[String], fresh: &str) -> Option<Vec<String>> {
    if existing.is_empty() {
        Some(vec![fresh.to_string()])
    } else {
        None
    }
}

/// Token sequence after revoking one token, or `None` when the token is not
/// present ("nothing to revoke").
///
/// Removes exactly the first occurrence and preserves the relative order of
/// every other entry.
#[must_use]
pub fn tokens_after_revoke(existing: &[String], token: &str) -> Option<Vec<String>> {
    let index = existing.iter().position(|t| t == token)?;
    let mut tokens = existing.to_vec();
    tokens.remove(index);
    Some(tokens)
}

/// Issue a token for an authenticated user, or return the already-issued one.
///
/// The caller has already verified credentials. When the user's sequence is
/// empty a fresh token is minted, appended and persisted; when it is not,
/// the existing token is returned unchanged and nothing is written.
pub async fn issue_token(
    pool: &PgPool,
    user: &User,
    private_key: &str,
    expiry_seconds: i64,
) -> AuthResult<String> {
    let mut current = user.clone();

    for _ in 0..MAX_SAVE_ATTEMPTS {
        let fresh = generate_token(current.id, private_key, expiry_seconds)?;
        let Some(tokens) = tokens_after_login(&current.issued_tokens, &fresh) else {
            return Ok(current.issued_tokens[0].clone());
        };

        if update_user_tokens(pool, current.id, &tokens, current.version).await? {
            return Ok(fresh);
        }

        warn!(user_id = %current.id, "Token issue lost a version race, retrying");
        current = find_user_by_id(pool, current.id)
            .await?
            .ok_or(AuthError::NoSession)?;
    }

    Err(AuthError::Conflict)
}

/// Revoke one token from a user's issued-token sequence.
///
/// A token that is not in the sequence yields [`AuthError::NoSession`]
/// ("nothing to revoke") rather than silently succeeding.
pub async fn revoke_token(pool: &PgPool, user_id: Uuid, token: &str) -> AuthResult<()> {
    let mut current = find_user_by_id(pool, user_id)
        .await?
        .ok_or(AuthError::NoSession)?;

    for _ in 0..MAX_SAVE_ATTEMPTS {
        let Some(tokens) = tokens_after_revoke(&current.issued_tokens, token) else {
            return Err(AuthError::NoSession);
        };

        if update_user_tokens(pool, current.id, &tokens, current.version).await? {
            return Ok(());
        }

        warn!(user_id = %current.id, "Token revoke lost a version race, retrying");
        current = find_user_by_id(pool, user_id)
            .await?
            .ok_or(AuthError::NoSession)?;
    }

    Err(AuthError::Conflict)
}

/// Resolve a bearer token to its live user, or `None` for no session.
///
/// Both validity checks run in order: decode the identity claim, then
/// confirm list-membership of the raw token string. A token that decodes
/// but has been revoked is not a session.
pub async fn autologin_user(
    pool: &PgPool,
    token: &str,
    public_key: &str,
) -> AuthResult<Option<User>> {
    let Ok(claims) = validate_token(token, public_key) else {
        return Ok(None);
    };
    let Ok(user_id) = claims.sub.parse::<Uuid>() else {
        return Ok(None);
    };

    let Some(user) = find_user_by_id(pool, user_id).await?.filter(|u| u.active) else {
        return Ok(None);
    };

    if user.issued_tokens.iter().any(|t| t == token) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_login_mints_into_empty_sequence() {
        let tokens = tokens_after_login(&[], "t1").unwrap();
        assert_eq!(tokens, seq(&["t1"]));
    }

    #[test]
    fn test_login_latches_on_existing_token() {
        // Second login without logout keeps the single issued token.
        assert_eq!(tokens_after_login(&seq(&["t1"]), "t2"), None);
    }

    #[test]
    fn test_revoke_removes_exactly_one_occurrence() {
        let tokens = tokens_after_revoke(&seq(&["t1", "t2", "t3"]), "t2").unwrap();
        assert_eq!(tokens, seq(&["t1", "t3"]));
    }

    #[test]
    fn test_revoke_preserves_relative_order() {
        let tokens = tokens_after_revoke(&seq(&["a", "b", "c", "d"]), "a").unwrap();
        assert_eq!(tokens, seq(&["b", "c", "d"]));
    }

    #[test]
    fn test_revoke_first_occurrence_only() {
        let tokens = tokens_after_revoke(&seq(&["t1", "t2", "t1"]), "t1").unwrap();
        assert_eq!(tokens, seq(&["t2", "t1"]));
    }

    #[test]
    fn test_revoke_missing_token_is_nothing_to_revoke() {
        assert_eq!(tokens_after_revoke(&seq(&["t1"]), "t9"), None);
        assert_eq!(tokens_after_revoke(&[], "t1"), None);
    }

    #[test]
    fn test_revoke_then_revoke_again() {
        let after = tokens_after_revoke(&seq(&["t1"]), "t1").unwrap();
        assert!(after.is_empty());
        assert_eq!(tokens_after_revoke(&after, "t1"), None);
    }
}
