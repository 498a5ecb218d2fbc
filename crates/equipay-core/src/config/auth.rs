//! Authentication configuration.

use serde::{Deserialize, Serialize};

use super::gate::GateConfig;
use crate::error::AppError;

/// Minimum accepted length of the token signing secret.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Token signing and authentication gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_hours: u64,
    /// Session lifetime in hours, written to `expires_at` at creation.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Clock skew tolerated when checking a token's own expiry, in seconds.
    #[serde(default = "default_leeway")]
    pub token_leeway_seconds: u64,
    /// Request authentication pipeline settings.
    #[serde(default)]
    pub gate: GateConfig,
}

impl AuthConfig {
    /// Rejects settings the token codec cannot safely run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret is too short, it should be at least {MIN_SECRET_LENGTH} characters"
            )));
        }
        if self.gate.token_name.trim().is_empty() {
            return Err(AppError::configuration("auth.gate.token_name must not be empty"));
        }
        Ok(())
    }
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    24 * 7
}

fn default_session_ttl() -> u64 {
    24 * 7
}

fn default_leeway() -> u64 {
    5
}
