//! In-memory registry of matchmaking sessions, one exclusive lock per session.
//!
//! Sessions not touched for [`INACTIVITY_TIMEOUT`] are dropped by
//! [`SessionRegistry::evict_inactive`].

use crate::models::{Configuration, Session};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Inactivity threshold: sessions not accessed for this long are removed.
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Errors from registry access (not from the session operations themselves).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegistryError {
    /// No session with this id (never created, removed, or evicted).
    SessionNotFound(SessionId),
    /// A thread panicked while holding a lock.
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::SessionNotFound(id) => write!(f, "No session {}", id),
            RegistryError::LockPoisoned => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Per-session entry: session data + name + last activity time (for auto-cleanup).
struct SessionEntry {
    name: String,
    session: Session,
    last_activity: Instant,
}

/// Many sessions by id. Access to one session is serialized; different sessions run in parallel.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionEntry>>>>,
    inactivity_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_timeout(INACTIVITY_TIMEOUT)
    }

    pub fn with_timeout(inactivity_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            inactivity_timeout,
        }
    }

    /// Create an empty session and return its id.
    pub fn create_session(
        &self,
        name: impl Into<String>,
        configuration: Configuration,
    ) -> Result<SessionId, RegistryError> {
        self.insert_session(name, Session::new(configuration))
    }

    /// Register an existing session (e.g. one restored from a snapshot).
    pub fn insert_session(
        &self,
        name: impl Into<String>,
        session: Session,
    ) -> Result<SessionId, RegistryError> {
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            name: name.into(),
            session,
            last_activity: Instant::now(),
        };
        let mut g = self
            .sessions
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        g.insert(id, Arc::new(Mutex::new(entry)));
        log::info!("created session {}", id);
        Ok(id)
    }

    fn entry(&self, id: SessionId) -> Result<Arc<Mutex<SessionEntry>>, RegistryError> {
        let g = self
            .sessions
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        g.get(&id)
            .cloned()
            .ok_or(RegistryError::SessionNotFound(id))
    }

    /// Run `f` with exclusive access to one session. Touching it refreshes last activity.
    pub fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, RegistryError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| RegistryError::LockPoisoned)?;
        guard.last_activity = Instant::now();
        Ok(f(&mut guard.session))
    }

    pub fn session_name(&self, id: SessionId) -> Result<String, RegistryError> {
        let entry = self.entry(id)?;
        let guard = entry.lock().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(guard.name.clone())
    }

    /// Drop a session. Returns false if it did not exist.
    pub fn remove_session(&self, id: SessionId) -> Result<bool, RegistryError> {
        let mut g = self
            .sessions
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(g.remove(&id).is_some())
    }

    pub fn session_ids(&self) -> Result<Vec<SessionId>, RegistryError> {
        let g = self
            .sessions
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(g.keys().copied().collect())
    }

    /// Remove sessions idle for longer than the timeout as of `now`. Returns how many went.
    pub fn evict_inactive(&self, now: Instant) -> Result<usize, RegistryError> {
        let mut g = self
            .sessions
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        let before = g.len();
        let timeout = self.inactivity_timeout;
        g.retain(|_, entry| {
            entry
                .lock()
                .map(|e| now.saturating_duration_since(e.last_activity) < timeout)
                .unwrap_or(false)
        });
        let removed = before - g.len();
        if removed > 0 {
            log::info!("Cleaned up {} inactive session(s)", removed);
        }
        Ok(removed)
    }
}
