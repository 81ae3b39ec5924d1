//! In-memory session store with per-session locking and expiration.
//!
//! The outer map is only ever held long enough to resolve an id to its
//! entry, so distinct sessions never block each other. All access to one
//! session serializes on that session's own mutex, which turn handlers may
//! hold across their whole turn. Expiry is checked on every read, so an
//! expired-but-unswept session is already unreachable between sweeps.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::interview::InterviewSession;

/// Errors from session lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session not found: {0}")]
    NotFound(SessionId),

    #[error("session expired: {0}")]
    Expired(SessionId),
}

/// Concurrent map of session id to session state.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<InterviewSession>>>>,
    /// Inactivity window for sessions still in progress.
    idle_ttl: Duration,
    /// Longer retention for completed sessions so reports stay retrievable.
    completed_retention: Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_ttl: Duration, completed_retention: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
            completed_retention,
        }
    }

    /// Inserts a session and returns its id.
    pub async fn insert(&self, session: InterviewSession) -> SessionId {
        let id = session.session_id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    /// Returns a snapshot of the session and refreshes its activity.
    ///
    /// An expired session is reported as such even before the sweep
    /// removes it.
    pub async fn get(&self, id: SessionId) -> Result<InterviewSession, SessionStoreError> {
        let entry = self.entry(id).await?;
        let mut session = entry.lock_owned().await;

        if self.is_expired(&session, Timestamp::now()) {
            return Err(SessionStoreError::Expired(id));
        }

        session.touch();
        Ok((*session).clone())
    }

    /// Locks a session for a turn-length critical section.
    ///
    /// The returned guard serializes all access to this session; holders
    /// mutate the guarded session (or a clone committed back into it) and
    /// drop the guard to release the turn.
    pub async fn lock_session(
        &self,
        id: SessionId,
    ) -> Result<OwnedMutexGuard<InterviewSession>, SessionStoreError> {
        let entry = self.entry(id).await?;
        let session = entry.lock_owned().await;

        if self.is_expired(&session, Timestamp::now()) {
            return Err(SessionStoreError::Expired(id));
        }

        Ok(session)
    }

    /// Atomic read-modify-write under the per-session lock.
    pub async fn update<F, T>(&self, id: SessionId, f: F) -> Result<T, SessionStoreError>
    where
        F: FnOnce(&mut InterviewSession) -> T,
    {
        let mut session = self.lock_session(id).await?;
        let result = f(&mut session);
        session.touch();
        Ok(result)
    }

    /// Removes a session. Returns whether it existed.
    pub async fn delete(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Number of stored sessions, including not-yet-swept expired ones.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Removes expired sessions. Each candidate is re-checked under its own
    /// lock at delete time, tolerating concurrent updates and deletes.
    pub async fn sweep_expired(&self) -> usize {
        let ids: Vec<SessionId> = self.sessions.read().await.keys().copied().collect();
        let now = Timestamp::now();
        let mut removed = 0;

        for id in ids {
            let Some(entry) = self.sessions.read().await.get(&id).cloned() else {
                continue;
            };
            let session = entry.lock_owned().await;
            if self.is_expired(&session, now) {
                self.sessions.write().await.remove(&id);
                removed += 1;
            }
        }

        removed
    }

    /// Spawns the background sweep at the given interval.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = store.sweep_expired().await;
                if removed > 0 {
                    debug!(removed, "swept expired sessions");
                }
            }
        })
    }

    async fn entry(
        &self,
        id: SessionId,
    ) -> Result<Arc<Mutex<InterviewSession>>, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(id))
    }

    fn is_expired(&self, session: &InterviewSession, now: Timestamp) -> bool {
        let ttl = if session.is_complete() {
            self.completed_retention
        } else {
            self.idle_ttl
        };
        now.secs_since(&session.last_activity) > ttl.as_secs()
    }
}
