use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::StudySession,
};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: StudySession) -> AppResult<StudySession>;
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<StudySession>>;
    async fn update(&self, session: StudySession) -> AppResult<StudySession>;
    async fn delete(&self, id: &Uuid) -> AppResult<bool>;
    /// Removes sessions not modified since `before`; returns how many were dropped.
    async fn purge_idle(&self, before: DateTime<Utc>) -> AppResult<usize>;
}

/// Process-local store; everything is lost on restart.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, StudySession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: StudySession) -> AppResult<StudySession> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(AppError::InternalError(format!(
                "Session '{}' already exists",
                session.id
            )));
        }
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<StudySession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn update(&self, mut session: StudySession) -> AppResult<StudySession> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.id) {
            return Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                session.id
            )));
        }
        session.touch();
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn purge_idle(&self, before: DateTime<Utc>) -> AppResult<usize> {
        let mut sessions = self.sessions.write().await;
        let initial = sessions.len();
        sessions.retain(|_, session| session.modified_at >= before);
        Ok(initial - sessions.len())
    }
}
