//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A durable record binding a user to a bearer credential, a client
/// fingerprint, and an expiry.
///
/// Created at login, made unusable by `expires_at` passing, by logout, or
/// by session-limit eviction (which moves `expires_at` to the eviction
/// time instead of deleting the row).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub session_id: Uuid,
    /// The user this session belongs to.
    pub user_id: i64,
    /// Bearer credential checked on every request.
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Credential used by the refresh flow.
    #[serde(skip_serializing)]
    pub refresh_token: String,
    /// User-Agent captured at creation.
    pub user_agent: String,
    /// Client IP captured at creation.
    pub ip_address: String,
    /// Free-form device description supplied by the client.
    pub device_info: Option<String>,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Last successfully authenticated request, if any.
    pub last_activity: Option<DateTime<Utc>>,
    /// Logical revocation flag.
    pub is_active: bool,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session authenticates iff it is active and `now` is strictly
    /// before its expiry.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now < self.expires_at
    }

    /// Check whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The user this session belongs to.
    pub user_id: i64,
    /// Issued access token.
    pub access_token: String,
    /// Issued refresh token.
    pub refresh_token: String,
    /// User-Agent of the client.
    pub user_agent: String,
    /// IP address of the client.
    pub ip_address: String,
    /// Device description.
    pub device_info: Option<String>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>, is_active: bool) -> Session {
        Session {
            session_id: Uuid::new_v4(),
            user_id: 7,
            access_token: "a".into(),
            refresh_token: "r".into(),
            user_agent: "ua".into(),
            ip_address: "10.0.0.1".into(),
            device_info: None,
            expires_at,
            last_activity: None,
            is_active,
            created_at: expires_at - Duration::hours(1),
        }
    }

    #[test]
    fn test_usable_before_expiry() {
        let now = Utc::now();
        assert!(session(now + Duration::seconds(1), true).is_usable_at(now));
    }

    #[test]
    fn test_expiry_boundary_is_not_usable() {
        let now = Utc::now();
        let s = session(now, true);
        assert!(!s.is_usable_at(now));
        assert!(s.is_expired_at(now));
    }

    #[test]
    fn test_inactive_never_usable() {
        let now = Utc::now();
        assert!(!session(now + Duration::days(1), false).is_usable_at(now));
    }

    #[test]
    fn test_tokens_not_serialized() {
        let now = Utc::now();
        let json = serde_json::to_value(session(now, true)).expect("serialize");
        assert!(json.get("access_token").is_none());
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["user_id"], 7);
    }
}
