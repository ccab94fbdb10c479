//! Generic access dispatcher.
//!
//! Single entry point composing trust resolution and rule resolution into a
//! grant/deny decision for any registered resource kind. Evaluation is
//! read-only; it is safe to run fully in parallel across requests.

use tracing::debug;
use uuid::Uuid;

use crate::api::AppState;

use super::error::AccessError;
use super::policy::{Action, Scope};
use super::resolver::resolve_rule;
use super::trust::{caller_identity, is_trusted};

/// Authorize an action against a resource kind.
///
/// `owner` is the owner identity the request addresses: the explicit
/// `/owner/{user_id}/…` path parameter for owner-scoped routes, or the
/// stored owner reference of the loaded document for id-addressed routes.
///
/// Evaluation order: unguarded actions pass unconditionally; a missing rule
/// denies; otherwise the grant bit selected by ownership side and action
/// scope decides.
pub async fn authorize(
    state: &AppState,
    token: Option<&str>,
    kind: &str,
    action: Action,
    owner: Option<Uuid>,
) -> Result<(), AccessError> {
    authorize_scoped(state, token, kind, action, None, owner).await
}

/// [`authorize`] with an explicit scope, for routes checked at a stricter
/// level than the action's default (e.g. rights administration at
/// [`Scope::Global`]).
pub async fn authorize_scoped(
    state: &AppState,
    token: Option<&str>,
    kind: &str,
    action: Action,
    scope: Option<Scope>,
    owner: Option<Uuid>,
) -> Result<(), AccessError> {
    let Some(policy) = state.policies.get(kind) else {
        return Err(AccessError::UnknownResource);
    };

    if !policy.action(action).guarded {
        return Ok(());
    }

    let caller = caller_identity(token, &state.config.jwt_public_key);
    let rule = resolve_rule(&state.db, caller, policy.right).await?;
    let trusted = is_trusted(caller, owner);

    let outcome = policy.evaluate(action, rule.as_ref(), trusted, scope);
    if outcome.is_err() {
        debug!(kind = %kind, action = ?action, trusted = trusted, "Access denied");
    }
    outcome
}
