//! Authorization resolution engine - remote policy with a static fallback
//!
//! This module answers "may this actor perform this action on this resource"
//! for the operations dashboard:
//! - Untrusted role strings collapse onto a closed canonical set
//! - The remote policy store is asked once per cache miss, never retried
//! - A hardcoded hierarchy supplies the verdict whenever the remote is
//!   unavailable or its payload is ambiguous
//! - Decisions are cached per authorization boundary and flushed whole on
//!   role change or teardown

mod cache;
mod extract;
mod policy;
mod resolver;
mod resource;
mod role;
mod session;
mod store;

pub use cache::{DecisionCache, DecisionKey};
pub use extract::{extract_boolean, Extracted};
pub use policy::{allowed_actions, can_manage, fallback_decision, grant_map};
pub use resolver::{AccessResolver, DecisionSource, Degradation};
pub use resource::{Action, Resource};
pub use role::Role;
pub use session::{SessionKey, SessionRegistry};
pub use store::{HttpPolicyStore, OfflinePolicyStore, PolicyStore, StoreError};

/// Role assumed when no actor can be resolved, read from `FALLBACK_ROLE`.
///
/// Defaults to [`Role::Unknown`], which holds no grants. A value outside the
/// canonical set is reported and treated as unknown rather than rejected.
pub fn fallback_role_from_env() -> Role {
    match std::env::var("FALLBACK_ROLE") {
        Ok(raw) => {
            let role = Role::normalize(Some(&raw));
            if role == Role::Unknown && !raw.eq_ignore_ascii_case("unknown") {
                tracing::warn!(
                    value = %raw,
                    "FALLBACK_ROLE is not a canonical role, defaulting to unknown"
                );
            }
            role
        }
        Err(_) => Role::Unknown,
    }
}
