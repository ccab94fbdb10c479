//! Access-Control Engine
//!
//! Decides, per request, whether a caller may perform a CRUD action on a
//! resource kind. Composes three small parts: the rule codec (six grant
//! flags packed into a 6-character string), the trust resolver (is the
//! caller the addressed owner), and the rule resolver (which right applies).
//! The dispatcher wires them to the per-resource policy table.

mod dispatcher;
mod error;
mod policy;
mod resolver;
mod rule;
mod trust;

pub use dispatcher::{authorize, authorize_scoped};
pub use error::AccessError;
pub use policy::{Action, ActionPolicy, PolicyRegistry, ResourcePolicy, Scope};
pub use resolver::{find_right, resolve_rule};
pub use rule::{validate_encoded_rule, DecodeRuleError, Rule, RuleFlags, ENCODED_RULE_LEN};
pub use trust::{caller_identity, is_trusted};
