//! Token claims payload.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by every Equipay token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID rendered as a decimal string.
    pub sub: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Unique token ID. Keeps tokens issued in the same second distinct.
    pub jti: Uuid,
}

impl Claims {
    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether the subject names the given user.
    ///
    /// Compared as strings; a numeric `sub` of `"007"` does not match user 7.
    pub fn is_subject(&self, user_id: i64) -> bool {
        self.sub == user_id.to_string()
    }
}
