use super::types::{ClientId, SessionState};
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

/// Sessions kept before `put` triggers an expiry sweep.
const SOFT_CAP: usize = 10_000;

/// Async session persistence contract: `ClientId -> SessionState`.
///
/// `get` never returns an expired session; backends drop such entries on
/// read. Writes replace the stored state wholesale (last write wins).
pub trait SessionStore: Send + Sync {
    fn get<'a>(
        &'a self,
        id: &'a ClientId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SessionState>>> + Send + 'a>>;

    fn put<'a>(
        &'a self,
        id: &'a ClientId,
        state: SessionState,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Remove every expired session, returning how many were removed.
    fn purge_expired(&self) -> Pin<Box<dyn Future<Output = Result<usize>> + Send + '_>>;
}

/// Process-local store; sessions vanish on restart.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<ClientId, SessionState>>,
    lifetime: Duration,
}

impl InMemorySessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            lifetime,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ClientId, SessionState>> {
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn purge_locked(&self, sessions: &mut HashMap<ClientId, SessionState>) -> usize {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, state| !state.is_expired(now, self.lifetime));
        before - sessions.len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get<'a>(
        &'a self,
        id: &'a ClientId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<SessionState>>> + Send + 'a>> {
        Box::pin(async move {
            let mut sessions = self.lock();
            let expired = sessions
                .get(id)
                .is_some_and(|state| state.is_expired(Utc::now(), self.lifetime));
            if expired {
                sessions.remove(id);
                return Ok(None);
            }
            Ok(sessions.get(id).cloned())
        })
    }

    fn put<'a>(
        &'a self,
        id: &'a ClientId,
        state: SessionState,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut sessions = self.lock();
            if sessions.len() >= SOFT_CAP {
                let purged = self.purge_locked(&mut sessions);
                tracing::debug!(purged, "session store reached soft cap");
            }
            sessions.insert(id.clone(), state);
            Ok(())
        })
    }

    fn purge_expired(&self) -> Pin<Box<dyn Future<Output = Result<usize>> + Send + '_>> {
        Box::pin(async move {
            let mut sessions = self.lock();
            Ok(self.purge_locked(&mut sessions))
        })
    }
}
