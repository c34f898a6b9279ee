//! In-memory store of running study sessions.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::StudySession;
use crate::services::cache::TtlCache;

/// A session together with who started it and on which set.
#[derive(Debug, Clone)]
pub struct OwnedSession {
    pub user_id: String,
    pub study_set_id: String,
    pub session: StudySession,
}

/// Sessions idle longer than the configured TTL are discarded; past
/// `capacity` the least recently used session is dropped.
pub struct SessionStore {
    sessions: Mutex<TtlCache<Uuid, OwnedSession>>,
}

impl SessionStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(TtlCache::new(capacity, ttl)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TtlCache<Uuid, OwnedSession>>> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::Internal("session store lock poisoned".to_string()))
    }

    /// Store a new session and return its id.
    pub fn insert(&self, owned: OwnedSession) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.lock()?.insert(id, owned);
        Ok(id)
    }

    /// Run `f` against a live session owned by `user_id`, refreshing its idle timer.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        user_id: &str,
        f: impl FnOnce(&mut OwnedSession) -> Result<T>,
    ) -> Result<T> {
        let now = Instant::now();
        let mut sessions = self.lock()?;

        let owned = sessions
            .get_mut_at(&id, now)
            .filter(|owned| owned.user_id == user_id)
            .ok_or_else(|| not_found(id))?;
        let value = f(owned)?;

        sessions.touch_at(&id, now);
        Ok(value)
    }

    /// Discard a session owned by `user_id`.
    pub fn remove(&self, id: Uuid, user_id: &str) -> Result<()> {
        self.with_session(id, user_id, |_| Ok(()))?;
        self.lock()?.remove(&id);
        Ok(())
    }

    /// Number of stored sessions, expired ones included until touched.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Study session {} not found", id))
}
