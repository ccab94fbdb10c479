//! Access-control evaluation tests.
//!
//! Exercise the policy table, rule codec and trust resolver together the
//! way the dispatcher composes them, without a database: the evaluation
//! itself is pure.

use sf_server::access::{
    find_right, is_trusted, Action, PolicyRegistry, ResourcePolicy, Rule, Scope,
};
use sf_server::db::Right;
use uuid::Uuid;

fn registry() -> PolicyRegistry {
    PolicyRegistry::new([
        ResourcePolicy::guarded("users", "users_right"),
        ResourcePolicy::guarded("catalogs", "catalogs_right"),
        ResourcePolicy::guarded("products", "products_right")
            .unguard(Action::List)
            .unguard(Action::Read),
    ])
}

#[test]
fn test_mixed_rule_scenario() {
    // own.global=1 own.private=0 own.public=1
    // other.global=0 other.private=1 other.public=0
    let rule = Rule::decode("101010").unwrap();
    let registry = registry();
    let policy = registry.get("catalogs").unwrap();

    let owner = Uuid::now_v7();

    // Trusted caller (caller == owner).
    let trusted = is_trusted(Some(owner), Some(owner));
    assert!(trusted);
    assert!(policy
        .evaluate(Action::Create, Some(&rule), trusted, None)
        .is_ok());
    assert!(policy
        .evaluate(Action::Update, Some(&rule), trusted, None)
        .is_err());

    // Untrusted caller (different identity).
    let untrusted = is_trusted(Some(Uuid::now_v7()), Some(owner));
    assert!(!untrusted);
    assert!(policy
        .evaluate(Action::Update, Some(&rule), untrusted, None)
        .is_ok());
    assert!(policy
        .evaluate(Action::Create, Some(&rule), untrusted, None)
        .is_err());
}

#[test]
fn test_default_deny_without_a_right() {
    let rights = vec![Right {
        resource: "catalogs_right".to_string(),
        rule: "111111".to_string(),
    }];

    // No entry for the users kind: nothing grants anything.
    assert!(find_right(&rights, "users_right").is_none());

    let registry = registry();
    let policy = registry.get("users").unwrap();
    for action in [
        Action::Create,
        Action::List,
        Action::Read,
        Action::Update,
        Action::Delete,
    ] {
        assert!(policy.evaluate(action, None, true, None).is_err());
        assert!(policy.evaluate(action, None, false, None).is_err());
    }
}

#[test]
fn test_anonymous_browsing_of_products() {
    let registry = registry();
    let policy = registry.get("products").unwrap();

    // No token, no rule: list and read still pass, writes do not.
    assert!(policy.evaluate(Action::List, None, false, None).is_ok());
    assert!(policy.evaluate(Action::Read, None, false, None).is_ok());
    assert!(policy.evaluate(Action::Create, None, false, None).is_err());
    assert!(policy.evaluate(Action::Delete, None, false, None).is_err());
}

#[test]
fn test_rights_administration_needs_the_global_bit() {
    let registry = registry();
    let policy = registry.get("users").unwrap();

    // Full private+public grants, but no global bit.
    let rule = Rule::decode("011011").unwrap();

    // A normal update passes...
    assert!(policy
        .evaluate(Action::Update, Some(&rule), true, None)
        .is_ok());
    // ...but the same action checked at global scope does not.
    assert!(policy
        .evaluate(Action::Update, Some(&rule), true, Some(Scope::Global))
        .is_err());
}

#[test]
fn test_trust_requires_exact_identity_match() {
    let owner = Uuid::now_v7();

    assert!(!is_trusted(None, Some(owner)));
    assert!(!is_trusted(Some(Uuid::now_v7()), Some(owner)));
    assert!(!is_trusted(Some(owner), None));
    assert!(is_trusted(Some(owner), Some(owner)));
}
