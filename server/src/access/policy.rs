//! Per-resource access policy configuration and evaluation.
//!
//! Every protected resource kind registers one [`ResourcePolicy`]: its right
//! name, which actions are guarded at all, and which rule scope each action
//! requires. The registry is built once at startup and carried in the shared
//! application state; nothing here is reached through globals.

use std::collections::HashMap;

use super::error::AccessError;
use super::rule::Rule;

/// CRUD-style action requested against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    List,
    Read,
    Update,
    Delete,
}

/// Rule scope an action is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Administrative / create-level.
    Global,
    /// Mutate / delete-level.
    Private,
    /// Read-level.
    Public,
}

impl Action {
    /// Default scope mapping: create is global, mutations are private,
    /// reads are public.
    #[must_use]
    pub const fn default_scope(self) -> Scope {
        match self {
            Self::Create => Scope::Global,
            Self::Update | Self::Delete => Scope::Private,
            Self::List | Self::Read => Scope::Public,
        }
    }
}

/// Guard configuration for one action of one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct ActionPolicy {
    /// Whether the action is subject to access checking at all.
    pub guarded: bool,
    /// Scope the rule is checked against when guarded.
    pub scope: Scope,
}

/// Access policy for one resource kind.
#[derive(Debug, Clone)]
pub struct ResourcePolicy {
    /// Resource kind key, used to address the policy from routes.
    pub kind: &'static str,
    /// Right name looked up in a user's rights set.
    pub right: &'static str,
    create: ActionPolicy,
    list: ActionPolicy,
    read: ActionPolicy,
    update: ActionPolicy,
    delete: ActionPolicy,
}

impl ResourcePolicy {
    /// Policy with every action guarded under the default scope mapping.
    #[must_use]
    pub const fn guarded(kind: &'static str, right: &'static str) -> Self {
        const fn guard(action: Action) -> ActionPolicy {
            ActionPolicy {
                guarded: true,
                scope: action.default_scope(),
            }
        }

        Self {
            kind,
            right,
            create: guard(Action::Create),
            list: guard(Action::List),
            read: guard(Action::Read),
            update: guard(Action::Update),
            delete: guard(Action::Delete),
        }
    }

    /// Mark an action as unguarded (allowed unconditionally).
    #[must_use]
    pub const fn unguard(mut self, action: Action) -> Self {
        let slot = ActionPolicy {
            guarded: false,
            scope: action.default_scope(),
        };
        match action {
            Action::Create => self.create = slot,
            Action::List => self.list = slot,
            Action::Read => self.read = slot,
            Action::Update => self.update = slot,
            Action::Delete => self.delete = slot,
        }
        self
    }

    /// Guard configuration for the given action.
    #[must_use]
    pub const fn action(&self, action: Action) -> &ActionPolicy {
        match action {
            Action::Create => &self.create,
            Action::List => &self.list,
            Action::Read => &self.read,
            Action::Update => &self.update,
            Action::Delete => &self.delete,
        }
    }

    /// Evaluate a resolved rule against this policy.
    ///
    /// `rule` is the caller's decoded rule for this kind (`None` when the
    /// caller has no matching right, which is default-deny). `trusted` selects the
    /// ownership side. `scope_override` replaces the action's configured
    /// scope for routes that demand a stricter level (e.g. rights
    /// administration checks at [`Scope::Global`]).
    pub fn evaluate(
        &self,
        action: Action,
        rule: Option<&Rule>,
        trusted: bool,
        scope_override: Option<Scope>,
    ) -> Result<(), AccessError> {
        let policy = self.action(action);
        if !policy.guarded {
            return Ok(());
        }

        let Some(rule) = rule else {
            return Err(AccessError::denied(action, self.kind));
        };

        let scope = scope_override.unwrap_or(policy.scope);
        if rule.side(trusted).scope(scope) {
            Ok(())
        } else {
            Err(AccessError::denied(action, self.kind))
        }
    }
}

/// Registry of resource policies, keyed by resource kind.
///
/// Constructed once at startup from the per-resource configurations and
/// shared by reference through the application state.
#[derive(Debug, Default)]
pub struct PolicyRegistry {
    policies: HashMap<&'static str, ResourcePolicy>,
}

impl PolicyRegistry {
    /// Build a registry from per-resource policies.
    #[must_use]
    pub fn new(policies: impl IntoIterator<Item = ResourcePolicy>) -> Self {
        Self {
            policies: policies.into_iter().map(|p| (p.kind, p)).collect(),
        }
    }

    /// Policy for a resource kind.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&ResourcePolicy> {
        self.policies.get(kind)
    }

    /// Whether any registered policy uses the given right name.
    #[must_use]
    pub fn knows_right(&self, right: &str) -> bool {
        self.policies.values().any(|p| p.right == right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ResourcePolicy {
        ResourcePolicy::guarded("catalogs", "catalogs_right")
    }

    #[test]
    fn test_default_scope_mapping() {
        assert_eq!(Action::Create.default_scope(), Scope::Global);
        assert_eq!(Action::Update.default_scope(), Scope::Private);
        assert_eq!(Action::Delete.default_scope(), Scope::Private);
        assert_eq!(Action::List.default_scope(), Scope::Public);
        assert_eq!(Action::Read.default_scope(), Scope::Public);
    }

    #[test]
    fn test_missing_rule_denies_every_guarded_action() {
        let policy = policy();
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
    fn test_unguarded_action_allows_without_rule() {
        let policy = policy().unguard(Action::List).unguard(Action::Read);
        assert!(policy.evaluate(Action::List, None, false, None).is_ok());
        assert!(policy.evaluate(Action::Read, None, false, None).is_ok());
        // Other actions stay guarded.
        assert!(policy.evaluate(Action::Create, None, false, None).is_err());
    }

    #[test]
    fn test_ownership_and_scope_selection() {
        // own: global+public, other: private only.
        let rule = Rule::decode("101010").unwrap();
        let policy = policy();

        // Trusted caller: create (global) allowed, update (private) denied.
        assert!(policy
            .evaluate(Action::Create, Some(&rule), true, None)
            .is_ok());
        assert!(policy
            .evaluate(Action::Update, Some(&rule), true, None)
            .is_err());

        // Untrusted caller: update allowed (other.private), create denied.
        assert!(policy
            .evaluate(Action::Update, Some(&rule), false, None)
            .is_ok());
        assert!(policy
            .evaluate(Action::Create, Some(&rule), false, None)
            .is_err());
    }

    #[test]
    fn test_denial_reason_matches_action() {
        let policy = policy();
        assert!(matches!(
            policy.evaluate(Action::Create, None, true, None),
            Err(AccessError::CanNotCreate { kind: "catalogs" })
        ));
        assert!(matches!(
            policy.evaluate(Action::Read, None, true, None),
            Err(AccessError::CanNotRead { .. })
        ));
        assert!(matches!(
            policy.evaluate(Action::Update, None, true, None),
            Err(AccessError::CanNotUpdate { .. })
        ));
        assert!(matches!(
            policy.evaluate(Action::Delete, None, true, None),
            Err(AccessError::CanNotDelete { .. })
        ));
    }

    #[test]
    fn test_scope_override() {
        // Read maps to public by default; an override checks global instead.
        let rule = Rule::decode("001000").unwrap();
        let policy = policy();

        assert!(policy
            .evaluate(Action::Read, Some(&rule), true, None)
            .is_ok());
        assert!(policy
            .evaluate(Action::Read, Some(&rule), true, Some(Scope::Global))
            .is_err());
    }

    #[test]
    fn test_registry_lookup() {
        let registry = PolicyRegistry::new([
            ResourcePolicy::guarded("catalogs", "catalogs_right"),
            ResourcePolicy::guarded("products", "products_right").unguard(Action::Read),
        ]);

        assert!(registry.get("catalogs").is_some());
        assert!(registry.get("reviews").is_none());
        assert!(registry.knows_right("products_right"));
        assert!(!registry.knows_right("reviews_right"));
    }
}
