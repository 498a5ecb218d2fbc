//! Identity published to downstream handlers after authentication.

use uuid::Uuid;

use equipay_core::types::ClientPlatform;
use equipay_entity::user::User;

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Owning user.
    pub user_id: i64,
    /// Session the bearer token resolved to.
    pub session_id: Uuid,
    /// Full user record.
    pub user: User,
    /// Classified client platform.
    pub platform: ClientPlatform,
    /// Device description stored with the session.
    pub device_info: Option<String>,
}
