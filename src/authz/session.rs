use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::resolver::AccessResolver;
use super::role::Role;
use super::store::PolicyStore;

/// Identity of one authorization boundary. Every request without a
/// resolvable actor lands on the shared anonymous boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Anonymous,
    Actor(Uuid),
}

impl SessionKey {
    fn from_actor(actor_id: Option<Uuid>) -> Self {
        match actor_id {
            Some(id) => SessionKey::Actor(id),
            None => SessionKey::Anonymous,
        }
    }
}

/// Registry of live per-boundary resolvers.
///
/// A resolver is created lazily on the first decision inside a boundary and
/// lives until the session is explicitly ended. Boundaries never share a
/// decision cache.
pub struct SessionRegistry {
    store: Arc<dyn PolicyStore>,
    fallback_role: Role,
    sessions: Mutex<HashMap<SessionKey, Arc<AccessResolver>>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn PolicyStore>, fallback_role: Role) -> Self {
        Self {
            store,
            fallback_role,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Resolver for the boundary `actor_id` belongs to, created on first use.
    pub fn resolver_for(&self, actor_id: Option<Uuid>) -> Arc<AccessResolver> {
        let key = SessionKey::from_actor(actor_id);
        let mut sessions = self.lock();
        Arc::clone(sessions.entry(key).or_insert_with(|| {
            tracing::debug!(session = ?key, "authorization boundary mounted");
            Arc::new(AccessResolver::new(
                Arc::clone(&self.store),
                self.fallback_role,
            ))
        }))
    }

    /// Tear down a boundary, flushing its cache first. Returns whether a
    /// live session existed.
    pub fn end_session(&self, actor_id: Option<Uuid>) -> bool {
        let key = SessionKey::from_actor(actor_id);
        match self.lock().remove(&key) {
            Some(resolver) => {
                resolver.invalidate();
                tracing::debug!(session = ?key, "authorization boundary torn down");
                true
            }
            None => false,
        }
    }

    /// Number of live boundaries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn fallback_role(&self) -> Role {
        self.fallback_role
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionKey, Arc<AccessResolver>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
