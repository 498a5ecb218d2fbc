//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use equipay_core::types::ClientPlatform;
use equipay_entity::user::User;

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `connected`, `unavailable`, or `not_configured`.
    pub database: String,
}

/// Profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Mobile number.
    pub mobile_number: String,
    /// Concurrent session limit.
    pub max_session: i16,
    /// Last login.
    pub last_login: Option<DateTime<Utc>>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            mobile_number: user.mobile_number.clone(),
            max_session: user.max_session,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

/// The session the current request authenticated with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Session ID.
    pub session_id: Uuid,
    /// Owning user.
    pub user_id: i64,
    /// Classified client platform.
    pub platform: ClientPlatform,
    /// Device description.
    pub device_info: Option<String>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}
