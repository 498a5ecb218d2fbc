//! User repository implementation.

use sqlx::PgPool;

use equipay_core::error::{AppError, ErrorKind};
use equipay_core::result::AppResult;
use equipay_entity::user::User;

/// Read access to the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, mobile_number, password, max_session, \
             is_active, last_login, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }
}
