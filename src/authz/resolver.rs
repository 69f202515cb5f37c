use std::sync::{Arc, Mutex, PoisonError};

use super::cache::{DecisionCache, DecisionKey};
use super::extract::{extract_boolean, Extracted};
use super::policy;
use super::resource::{Action, Resource};
use super::role::Role;
use super::store::{PolicyStore, StoreError};

/// Why a resolution could not use the authoritative answer. These are logged,
/// never returned; every decision still completes with a boolean.
#[derive(Debug, thiserror::Error)]
pub enum Degradation {
    /// The policy store call failed outright.
    #[error("policy store unavailable: {0}")]
    RemoteUnavailable(StoreError),
    /// The store answered, but no boolean verdict could be extracted.
    #[error("policy response indeterminate")]
    IndeterminateResponse,
    /// The actor's role string is outside the canonical set.
    #[error("unrecognized role {0:?}")]
    UnrecognizedRole(String),
    /// No actor could be resolved for the request.
    #[error("no current actor")]
    MissingActor,
}

/// Where a decision came from, for the structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Cache,
    Remote,
    Fallback,
}

impl DecisionSource {
    fn as_str(self) -> &'static str {
        match self {
            DecisionSource::Cache => "cache",
            DecisionSource::Remote => "remote",
            DecisionSource::Fallback => "fallback",
        }
    }
}

/// Per-session authorization resolver.
///
/// One resolver is mounted per authorization boundary: an authenticated
/// actor, or the shared anonymous boundary. It owns that boundary's decision
/// cache plus the last role observed for it, which drives edge-triggered
/// invalidation when the actor's role changes mid-session.
///
/// Resolution ladder, per decision:
/// 1. normalize the raw role claim, substituting the configured fallback
///    role when there is no actor at all
/// 2. cached verdict, if any
/// 3. one remote policy call, its payload probed for a boolean
/// 4. the static hierarchy, whenever the remote fails or is ambiguous
pub struct AccessResolver {
    store: Arc<dyn PolicyStore>,
    cache: DecisionCache,
    fallback_role: Role,
    observed_role: Mutex<Option<Role>>,
}

impl AccessResolver {
    pub fn new(store: Arc<dyn PolicyStore>, fallback_role: Role) -> Self {
        Self {
            store,
            cache: DecisionCache::default(),
            fallback_role,
            observed_role: Mutex::new(None),
        }
    }

    /// Decide whether the current actor may perform `action` on `resource`.
    ///
    /// `actor_role` is the raw claim value; `None` means no actor could be
    /// resolved. This never fails: every degraded path lands on the static
    /// hierarchy and a denial is just `false`.
    pub async fn check_permission(
        &self,
        actor_role: Option<&str>,
        resource: Resource,
        action: Action,
    ) -> bool {
        let role = self.resolve_role(actor_role);
        self.observe(role);

        let key = DecisionKey::Permission {
            role,
            resource,
            action,
        };
        if let Some(allowed) = self.cache.get(&key) {
            self.log_decision(role, &key, allowed, DecisionSource::Cache);
            return allowed;
        }

        // Computed unconditionally, even when the remote is healthy.
        let fallback = policy::fallback_decision(role, resource, action);

        let (allowed, source) = match self.store.evaluate_permission(role, resource, action).await {
            Ok(payload) => match extract_boolean(&payload) {
                Extracted::Bool(verdict) => (verdict, DecisionSource::Remote),
                Extracted::Indeterminate => {
                    tracing::warn!(
                        role = %role,
                        resource = %resource,
                        action = %action,
                        payload = ?payload,
                        error = %Degradation::IndeterminateResponse,
                        "using static hierarchy"
                    );
                    (fallback, DecisionSource::Fallback)
                }
            },
            Err(err) => {
                tracing::warn!(
                    role = %role,
                    resource = %resource,
                    action = %action,
                    error = %Degradation::RemoteUnavailable(err),
                    "using static hierarchy"
                );
                (fallback, DecisionSource::Fallback)
            }
        };

        self.cache.set(key, allowed);
        self.log_decision(role, &key, allowed, source);
        allowed
    }

    /// Decide whether the current actor may manage accounts holding
    /// `target_role`. Same ladder as [`Self::check_permission`], with the
    /// role rank table standing in as the static policy.
    pub async fn can_manage_role(&self, actor_role: Option<&str>, target_role: &str) -> bool {
        let manager = self.resolve_role(actor_role);
        self.observe(manager);
        let target = Role::normalize(Some(target_role));

        let key = DecisionKey::Management { manager, target };
        if let Some(allowed) = self.cache.get(&key) {
            self.log_decision(manager, &key, allowed, DecisionSource::Cache);
            return allowed;
        }

        let fallback = policy::can_manage(manager, target);

        let (allowed, source) = match self.store.evaluate_role_management(manager, target).await {
            Ok(payload) => match extract_boolean(&payload) {
                Extracted::Bool(verdict) => (verdict, DecisionSource::Remote),
                Extracted::Indeterminate => {
                    tracing::warn!(
                        manager = %manager,
                        target = %target,
                        payload = ?payload,
                        error = %Degradation::IndeterminateResponse,
                        "using rank table"
                    );
                    (fallback, DecisionSource::Fallback)
                }
            },
            Err(err) => {
                tracing::warn!(
                    manager = %manager,
                    target = %target,
                    error = %Degradation::RemoteUnavailable(err),
                    "using rank table"
                );
                (fallback, DecisionSource::Fallback)
            }
        };

        self.cache.set(key, allowed);
        self.log_decision(manager, &key, allowed, source);
        allowed
    }

    /// Flush every cached decision, as on session teardown.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Number of decisions currently cached.
    pub fn cached_decisions(&self) -> usize {
        self.cache.len()
    }

    fn resolve_role(&self, raw: Option<&str>) -> Role {
        match raw {
            None => {
                tracing::debug!(
                    error = %Degradation::MissingActor,
                    fallback_role = %self.fallback_role,
                    "substituting configured fallback role"
                );
                self.fallback_role
            }
            Some(raw) => {
                let role = Role::normalize(Some(raw));
                if role == Role::Unknown {
                    tracing::warn!(
                        error = %Degradation::UnrecognizedRole(raw.to_string()),
                        "treating actor as unknown"
                    );
                }
                role
            }
        }
    }

    /// Record the role this boundary is operating under. A change flushes the
    /// cache before the next lookup, so verdicts reached under the previous
    /// role never leak across. Repeat observations of the same role are
    /// no-ops.
    fn observe(&self, role: Role) {
        let mut observed = self
            .observed_role
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match *observed {
            Some(previous) if previous == role => {}
            Some(previous) => {
                self.cache.clear();
                tracing::debug!(
                    previous = %previous,
                    current = %role,
                    "actor role changed, decision cache flushed"
                );
                *observed = Some(role);
            }
            None => *observed = Some(role),
        }
    }

    fn log_decision(&self, role: Role, key: &DecisionKey, allowed: bool, source: DecisionSource) {
        match key {
            DecisionKey::Permission {
                resource, action, ..
            } => {
                tracing::debug!(
                    role = %role,
                    resource = %resource,
                    action = %action,
                    allowed,
                    source = source.as_str(),
                    "permission resolved"
                );
            }
            DecisionKey::Management { target, .. } => {
                tracing::debug!(
                    manager = %role,
                    target = %target,
                    allowed,
                    source = source.as_str(),
                    "role management resolved"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::store::OfflinePolicyStore;

    fn offline_resolver(fallback_role: Role) -> AccessResolver {
        AccessResolver::new(Arc::new(OfflinePolicyStore), fallback_role)
    }

    #[tokio::test]
    async fn offline_store_serves_static_hierarchy() {
        let resolver = offline_resolver(Role::Unknown);

        assert!(
            resolver
                .check_permission(Some("admin"), Resource::SystemLog, Action::Delete)
                .await
        );
        assert!(
            !resolver
                .check_permission(Some("operario"), Resource::Users, Action::View)
                .await
        );
    }

    #[tokio::test]
    async fn unrecognized_role_is_denied() {
        let resolver = offline_resolver(Role::Unknown);

        assert!(
            !resolver
                .check_permission(Some("intruso"), Resource::Dashboard, Action::View)
                .await
        );
    }

    #[tokio::test]
    async fn missing_actor_uses_configured_fallback_role() {
        let resolver = offline_resolver(Role::Operario);

        assert!(
            resolver
                .check_permission(None, Resource::Dashboard, Action::View)
                .await
        );
        assert!(
            !resolver
                .check_permission(None, Resource::Users, Action::View)
                .await
        );
    }

    #[tokio::test]
    async fn role_change_flushes_cached_decisions() {
        let resolver = offline_resolver(Role::Unknown);

        resolver
            .check_permission(Some("manager"), Resource::Users, Action::View)
            .await;
        resolver
            .check_permission(Some("manager"), Resource::Archive, Action::View)
            .await;
        assert_eq!(resolver.cached_decisions(), 2);

        // Same role again: nothing flushed.
        resolver
            .check_permission(Some("manager"), Resource::Users, Action::View)
            .await;
        assert_eq!(resolver.cached_decisions(), 2);

        // Different role: flush, then one fresh entry.
        resolver
            .check_permission(Some("operario"), Resource::Dashboard, Action::View)
            .await;
        assert_eq!(resolver.cached_decisions(), 1);
    }

    #[tokio::test]
    async fn management_falls_back_to_rank_order() {
        let resolver = offline_resolver(Role::Unknown);

        assert!(resolver.can_manage_role(Some("manager"), "operario").await);
        assert!(!resolver.can_manage_role(Some("operario"), "manager").await);
        assert!(!resolver.can_manage_role(Some("manager"), "manager").await);
        assert!(resolver.can_manage_role(Some("manager"), "no-such-role").await);
    }

    #[tokio::test]
    async fn invalidate_empties_the_cache() {
        let resolver = offline_resolver(Role::Unknown);

        resolver
            .check_permission(Some("admin"), Resource::Dashboard, Action::View)
            .await;
        assert_eq!(resolver.cached_decisions(), 1);

        resolver.invalidate();
        assert_eq!(resolver.cached_decisions(), 0);
    }
}
