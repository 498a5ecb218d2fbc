//! Session repository implementation.
//!
//! Every mutation is a single autocommitted statement so that no write
//! can be lost in a batch.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use equipay_core::error::{AppError, ErrorKind};
use equipay_core::result::AppResult;
use equipay_entity::session::{CreateSession, Session};

const SESSION_COLUMNS: &str = "session_id, user_id, access_token, refresh_token, user_agent, \
     ip_address, device_info, expires_at, last_activity, is_active, created_at";

/// Repository for the `user_sessions` table.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an active session by exact access token value.
    ///
    /// Expiry is not filtered; the caller reports expired and unknown
    /// tokens differently.
    pub async fn find_active_by_access_token(&self, token: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM user_sessions \
             WHERE access_token = $1 AND is_active = TRUE"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
        })
    }

    /// List a user's usable sessions other than `excluding`, least recently
    /// active first. Sessions with no recorded activity come first.
    pub async fn find_usable_by_user_excluding(
        &self,
        user_id: i64,
        excluding: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM user_sessions \
             WHERE user_id = $1 AND session_id <> $2 AND is_active = TRUE AND expires_at > $3 \
             ORDER BY last_activity ASC NULLS FIRST, created_at ASC"
        ))
        .bind(user_id)
        .bind(excluding)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list usable sessions", e)
        })
    }

    /// Insert a new session.
    pub async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(&format!(
            "INSERT INTO user_sessions \
             (session_id, user_id, access_token, refresh_token, user_agent, ip_address, \
              device_info, expires_at, last_activity, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NULL, TRUE, NOW()) \
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.access_token)
        .bind(&data.refresh_token)
        .bind(&data.user_agent)
        .bind(&data.ip_address)
        .bind(&data.device_info)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Move `last_activity` forward to `at`. Never moves it backward.
    pub async fn update_last_activity(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE user_sessions SET last_activity = $2 \
             WHERE session_id = $1 AND (last_activity IS NULL OR last_activity < $2)",
        )
        .bind(session_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update last activity", e)
        })?;
        Ok(())
    }

    /// Pull `expires_at` back to `at`. An earlier expiry is left untouched.
    pub async fn expire(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE user_sessions SET expires_at = $2 WHERE session_id = $1 AND expires_at > $2",
        )
        .bind(session_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to expire session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the active flag (explicit logout).
    pub async fn deactivate(&self, session_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE user_sessions SET is_active = FALSE WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate session", e)
            })?;
        Ok(())
    }
}
