use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::quiz::session::QuizSession;

pub type SharedSession = Arc<Mutex<QuizSession>>;

/// In-memory session registry. Nothing outlives the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SharedSession {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(QuizSession::new(id)));
        self.sessions
            .write()
            .await
            .insert(id, Arc::clone(&session));
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions untouched for longer than `max_idle`. A session that is
    /// currently locked is in use and is kept.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(guard) => !guard.is_idle(now, max_idle),
            Err(_) => true,
        });
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let session = store.create().await;
        let id = session.lock().await.id();

        let found = store.get(id).await.unwrap();
        assert!(Arc::ptr_eq(&session, &found));
        assert!(store.get(Uuid::new_v4()).await.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_purge_keeps_recent_sessions() {
        let store = SessionStore::new();
        store.create().await;
        store.create().await;
        assert_eq!(store.purge_idle(Duration::minutes(60)).await, 0);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_purge_drops_idle_sessions() {
        let store = SessionStore::new();
        store.create().await;
        assert_eq!(store.purge_idle(Duration::seconds(-1)).await, 1);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_purge_skips_locked_sessions() {
        let store = SessionStore::new();
        let session = store.create().await;
        let _guard = session.lock().await;
        assert_eq!(store.purge_idle(Duration::seconds(-1)).await, 0);
    }
}
