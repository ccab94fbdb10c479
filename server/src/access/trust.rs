//! Per-request trust resolution.
//!
//! Trust is a derived boolean: the identity embedded in the caller's token
//! equals the owner identity named by the request's addressing parameters.
//! It is recomputed on every request and never cached. Resolution is cheap
//! and side-effect-free so it can run before any persistence access.

use uuid::Uuid;

use crate::auth::jwt::validate_token;

/// Identity of the caller, decoded from the bearer token.
///
/// No database lookup happens here: the identity claim is read straight from
/// the token. Absent, expired and malformed tokens all yield `None`; a
/// malformed token is treated as an absent identity, not as a distinct state.
#[must_use]
pub fn caller_identity(token: Option<&str>, public_key: &str) -> Option<Uuid> {
    let claims = validate_token(token?, public_key).ok()?;
    claims.sub.parse().ok()
}

/// Whether the caller is the owner addressed by the request.
///
/// True only when both identities are present and exactly equal. A missing
/// token or a missing owner parameter is never trusted.
#[must_use]
pub fn is_trusted(caller: Option<Uuid>, owner: Option<Uuid>) -> bool {
    match (caller, owner) {
        (Some(caller), Some(owner)) => caller == owner,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_trusted_without_caller() {
        assert!(!is_trusted(None, Some(Uuid::now_v7())));
    }

    #[test]
    fn test_not_trusted_without_owner() {
        assert!(!is_trusted(Some(Uuid::now_v7()), None));
    }

    #[test]
    fn test_not_trusted_when_both_absent() {
        assert!(!is_trusted(None, None));
    }

    #[test]
    fn test_not_trusted_on_mismatch() {
        assert!(!is_trusted(Some(Uuid::now_v7()), Some(Uuid::now_v7())));
    }

    #[test]
    fn test_trusted_on_exact_match() {
        let id = Uuid::now_v7();
        assert!(is_trusted(Some(id), Some(id)));
    }

    #[test]
    fn test_caller_identity_absent_token() {
        assert_eq!(caller_identity(None, "irrelevant"), None);
    }

    #[test]
    fn test_caller_identity_garbage_token() {
        // Malformed tokens resolve to an absent identity, never an error.
        assert_eq!(caller_identity(Some("not-a-token"), "bm90LWEta2V5"), None);
    }
}
