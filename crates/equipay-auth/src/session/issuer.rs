//! Session creation at login.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use equipay_core::config::AuthConfig;
use equipay_core::error::AppError;
use equipay_core::result::AppResult;
use equipay_entity::session::{CreateSession, Session};

use crate::jwt::TokenCodec;

use super::store::SessionStore;

/// Client attributes captured when a session is created.
#[derive(Debug, Clone, Default)]
pub struct ClientFingerprint {
    /// Resolved client IP.
    pub ip_address: String,
    /// Raw User-Agent header.
    pub user_agent: String,
    /// Free-form device description.
    pub device_info: Option<String>,
}

/// Result of issuing a session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// The persisted session.
    pub session: Session,
    /// Bearer credential for subsequent requests.
    pub access_token: String,
    /// Credential for the refresh flow.
    pub refresh_token: String,
}

/// Issues tokens and persists the session that binds them.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

impl SessionIssuer {
    /// Creates an issuer.
    pub fn new(codec: Arc<TokenCodec>, sessions: Arc<dyn SessionStore>, config: &AuthConfig) -> Self {
        Self {
            codec,
            sessions,
            session_ttl: Duration::hours(config.session_ttl_hours as i64),
        }
    }

    /// Signs an access / refresh pair for `user_id` and stores a session for it.
    pub async fn issue(&self, user_id: i64, client: ClientFingerprint) -> AppResult<IssuedSession> {
        let subject = user_id.to_string();
        let access = self
            .codec
            .issue_access(&subject)
            .map_err(|e| AppError::internal(format!("Failed to issue access token: {e}")))?;
        let refresh = self
            .codec
            .issue_refresh(&subject)
            .map_err(|e| AppError::internal(format!("Failed to issue refresh token: {e}")))?;

        let session = self
            .sessions
            .create(CreateSession {
                user_id,
                access_token: access.token.clone(),
                refresh_token: refresh.token.clone(),
                user_agent: client.user_agent,
                ip_address: client.ip_address,
                device_info: client.device_info,
                expires_at: Utc::now() + self.session_ttl,
            })
            .await?;

        info!(
            user_id = user_id,
            session_id = %session.session_id,
            expires_at = %session.expires_at,
            "Session issued"
        );

        Ok(IssuedSession {
            session,
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }
}
