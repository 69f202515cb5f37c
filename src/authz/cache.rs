use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::resource::{Action, Resource};
use super::role::Role;

/// Key for one cached decision. Permission checks and role-management checks
/// live in the same map but can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKey {
    Permission {
        role: Role,
        resource: Resource,
        action: Action,
    },
    Management {
        manager: Role,
        target: Role,
    },
}

/// Session-scoped decision cache.
///
/// The key space is bounded by the closed enumerations, so there is no TTL
/// and no eviction; entries only leave through [`DecisionCache::clear`],
/// which the resolver invokes on role change and session teardown.
#[derive(Debug, Default)]
pub struct DecisionCache {
    entries: Mutex<HashMap<DecisionKey, bool>>,
}

impl DecisionCache {
    pub fn get(&self, key: &DecisionKey) -> Option<bool> {
        self.lock().get(key).copied()
    }

    pub fn set(&self, key: DecisionKey, allowed: bool) {
        self.lock().insert(key, allowed);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Poisoning is recovered rather than propagated; no operation on the map
    // leaves it in a partial state.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DecisionKey, bool>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
