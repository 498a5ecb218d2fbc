//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
///
/// The user lifecycle belongs to the user-management flow; authentication
/// only reads existence and `max_session`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Contact number.
    pub mobile_number: String,
    /// Password hash.
    #[serde(skip_serializing)]
    pub password: String,
    /// Maximum concurrent sessions. `<= 0` means unlimited.
    pub max_session: i16,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
