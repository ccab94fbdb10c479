//! Authentication integration tests.
//!
//! Covers the pieces of the token lifecycle that need no database:
//! - Password hashing and verification
//! - Token generation/validation against the configured key pair
//! - Issued-token sequence edits (single-session latch, exact revocation)
//!
//! Database-backed lifecycle tests live in `src/db/tests.rs` and run with
//! `#[sqlx::test]` against a real `PostgreSQL`.

use sf_server::auth::jwt::{generate_token, validate_token};
use sf_server::auth::session::{tokens_after_login, tokens_after_revoke};
use sf_server::auth::{hash_password, verify_password};
use sf_server::config::Config;
use uuid::Uuid;

// ============================================================================
// Password Hashing Tests
// ============================================================================

#[test]
fn test_password_hash_and_verify_success() {
    let password = "secure_password_123!";
    let hash = hash_password(password).expect("Hashing should succeed");

    // Hash should be different from password
    assert_ne!(hash, password);

    // Verification should succeed
    let verified = verify_password(password, &hash).expect("Verification should succeed");
    assert!(verified, "Correct password should verify");
}

#[test]
fn test_password_verify_wrong_password() {
    let hash = hash_password("correct_password").expect("Hashing should succeed");

    let verified = verify_password("wrong_password", &hash).expect("Verification should succeed");
    assert!(!verified, "Wrong password should not verify");
}

#[test]
fn test_password_hash_produces_unique_hashes() {
    let password = "same_password";

    let hash1 = hash_password(password).expect("Hashing should succeed");
    let hash2 = hash_password(password).expect("Hashing should succeed");

    // Same password should produce different hashes (due to salt)
    assert_ne!(hash1, hash2);

    // Both should verify correctly
    assert!(verify_password(password, &hash1).unwrap());
    assert!(verify_password(password, &hash2).unwrap());
}

#[test]
fn test_password_hash_handles_unicode() {
    let unicode_password = "密码🔐パスワード";

    let hash = hash_password(unicode_password).expect("Hashing unicode should succeed");
    assert!(verify_password(unicode_password, &hash).unwrap());
}

// ============================================================================
// Token Tests
// ============================================================================

#[test]
fn test_token_roundtrip_with_test_config() {
    let config = Config::default_for_test();
    let user_id = Uuid::now_v7();

    let token = generate_token(user_id, &config.jwt_private_key, config.jwt_token_expiry)
        .expect("Token generation should succeed");
    let claims =
        validate_token(&token, &config.jwt_public_key).expect("Validation should succeed");

    assert_eq!(claims.sub, user_id.to_string());
}

#[test]
fn test_expired_token_is_no_session() {
    let config = Config::default_for_test();
    let user_id = Uuid::now_v7();

    let token =
        generate_token(user_id, &config.jwt_private_key, -60).expect("Generation should succeed");

    assert!(validate_token(&token, &config.jwt_public_key).is_err());
}

// ============================================================================
// Issued-Token Sequence Tests
// ============================================================================

fn seq(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

#[test]
fn test_login_only_mints_into_empty_sequence() {
    // Empty sequence: the fresh token is appended.
    assert_eq!(tokens_after_login(&[], "fresh"), Some(seq(&["fresh"])));

    // Non-empty sequence: single-session latch, nothing changes.
    assert_eq!(tokens_after_login(&seq(&["live"]), "fresh"), None);
}

#[test]
fn test_revoke_removes_exactly_the_presented_token() {
    let after = tokens_after_revoke(&seq(&["a", "b", "c"]), "b").unwrap();
    assert_eq!(after, seq(&["a", "c"]));
}

#[test]
fn test_revoke_missing_token_reports_nothing_to_revoke() {
    assert_eq!(tokens_after_revoke(&seq(&["a"]), "z"), None);
}

#[test]
fn test_login_logout_login_cycle() {
    // Login into empty sequence.
    let after_login = tokens_after_login(&[], "t1").unwrap();
    assert_eq!(after_login.len(), 1);

    // Second login latches.
    assert_eq!(tokens_after_login(&after_login, "t2"), None);

    // Logout empties the sequence.
    let after_logout = tokens_after_revoke(&after_login, "t1").unwrap();
    assert!(after_logout.is_empty());

    // Logging out again has nothing to revoke.
    assert_eq!(tokens_after_revoke(&after_logout, "t1"), None);

    // A new login can mint again.
    assert_eq!(tokens_after_login(&after_logout, "t3"), Some(seq(&["t3"])));
}
