//! Storage seams used by the authentication gate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use equipay_core::result::AppResult;
use equipay_entity::session::{CreateSession, Session};
use equipay_entity::user::User;

/// Durable session persistence.
///
/// Implementations must be safe to call from many concurrent requests.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Finds the session whose access token equals `token` and which is
    /// still flagged active. Expiry is not checked here.
    async fn find_usable_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// Records activity on a session. Never moves `last_activity` backwards.
    async fn touch(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Lists the user's active, unexpired sessions other than `excluding`,
    /// least recently active first.
    async fn list_usable(
        &self,
        user_id: i64,
        excluding: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Session>>;

    /// Ends a session by moving `expires_at` to `at`. A session that already
    /// expired earlier is left as is.
    async fn revoke(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Persists a new session.
    async fn create(&self, data: CreateSession) -> AppResult<Session>;

    /// Clears the active flag (logout).
    async fn deactivate(&self, session_id: Uuid) -> AppResult<()>;
}

/// Read access to user records.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Loads a user by ID.
    async fn find_user(&self, user_id: i64) -> AppResult<Option<User>>;
}
