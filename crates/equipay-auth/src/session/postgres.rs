//! PostgreSQL-backed stores.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use equipay_core::result::AppResult;
use equipay_database::repositories::{SessionRepository, UserRepository};
use equipay_entity::session::{CreateSession, Session};
use equipay_entity::user::User;

use super::store::{SessionStore, UserStore};

/// Session store over the `user_sessions` table.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    repo: Arc<SessionRepository>,
}

impl PgSessionStore {
    /// Wraps a session repository.
    pub fn new(repo: Arc<SessionRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find_usable_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        self.repo.find_active_by_access_token(token).await
    }

    async fn touch(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.repo.update_last_activity(session_id, at).await
    }

    async fn list_usable(
        &self,
        user_id: i64,
        excluding: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        self.repo
            .find_usable_by_user_excluding(user_id, excluding, now)
            .await
    }

    async fn revoke(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.repo.expire(session_id, at).await.map(|_| ())
    }

    async fn create(&self, data: CreateSession) -> AppResult<Session> {
        self.repo.create(&data).await
    }

    async fn deactivate(&self, session_id: Uuid) -> AppResult<()> {
        self.repo.deactivate(session_id).await
    }
}

/// User store over the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    repo: Arc<UserRepository>,
}

impl PgUserStore {
    /// Wraps a user repository.
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_user(&self, user_id: i64) -> AppResult<Option<User>> {
        self.repo.find_by_id(user_id).await
    }
}
