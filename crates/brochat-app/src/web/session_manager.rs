use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::chat::SessionState;
use crate::web::protocol::SessionInfo;

pub type SessionId = Uuid;

/// A browser session.
///
/// The state mutex is held for the whole of a request, including any backend
/// call, so requests on one session are processed strictly in order.
pub struct Session {
    pub id: SessionId,
    pub state: Arc<Mutex<SessionState>>,
    pub created_at: DateTime<Utc>,
    pub last_activity: Arc<Mutex<DateTime<Utc>>>,
}

impl Session {
    pub fn new(id: SessionId, state: SessionState) -> Self {
        Self {
            id,
            state: Arc::new(Mutex::new(state)),
            created_at: Utc::now(),
            last_activity: Arc::new(Mutex::new(Utc::now())),
        }
    }

    pub async fn update_activity(&self) {
        *self.last_activity.lock().await = Utc::now();
    }

    pub async fn get_info(&self) -> SessionInfo {
        let state = self.state.lock().await;
        let last_activity = *self.last_activity.lock().await;

        SessionInfo {
            id: self.id,
            created_at: self.created_at.to_rfc3339(),
            last_activity: last_activity.to_rfc3339(),
            message_count: state.history().len(),
            bro_icon: state.bro_icon.key().to_string(),
            backend: state.backend.phase(),
            model: state.ready_backend().map(|h| h.model.clone()),
            has_image: state.uploaded_image.is_some(),
        }
    }
}

/// Manages all active sessions
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Session>>>>,
    idle_ttl: Option<Duration>,
}

impl SessionManager {
    /// `idle_ttl` of `None` keeps sessions until they are removed explicitly
    pub fn new(idle_ttl: Option<Duration>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Register a new session seeded with `state`
    pub async fn create_session(&self, state: SessionState) -> SessionId {
        if let Some(ttl) = self.idle_ttl {
            let removed = self.cleanup_inactive(ttl).await;
            if removed > 0 {
                log::info!("Dropped {} idle session(s)", removed);
            }
        }

        let session_id = Uuid::new_v4();
        let session = Arc::new(Session::new(session_id, state));
        self.sessions.write().await.insert(session_id, session);
        log::debug!("Created session {}", session_id);

        session_id
    }

    /// Get a session by ID
    pub async fn get_session(&self, session_id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// List all active sessions, most recently active first
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();
        let mut infos = Vec::with_capacity(sessions.len());

        for session in sessions {
            infos.push(session.get_info().await);
        }

        infos.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        infos
    }

    /// Remove a session. Returns false when it did not exist.
    pub async fn remove_session(&self, session_id: &SessionId) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than `ttl`; returns how many were removed
    pub async fn cleanup_inactive(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let sessions: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();

        let mut stale = Vec::new();
        for session in sessions {
            if *session.last_activity.lock().await < cutoff {
                stale.push(session.id);
            }
        }

        let mut map = self.sessions.write().await;
        for id in &stale {
            map.remove(id);
        }
        stale.len()
    }
}
