//! The authentication gate: an ordered pipeline run once per request.
//!
//! ```text
//! exempt? ─yes─> Exempt
//!   │no
//! extract ─> resolve ─> expiry ─> fingerprint ─> touch ─> publish ─> limit ─> Authenticated
//! ```
//!
//! Every fatal stage returns an [`AuthRejection`]; `touch` and `limit`
//! failures are logged and swallowed.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, Uri};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use equipay_auth::fingerprint::{FingerprintPolicy, client_ip};
use equipay_auth::jwt::TokenCodec;
use equipay_auth::limiter::SessionLimiter;
use equipay_auth::platform::classify_platform;
use equipay_auth::session::{SessionStore, UserStore};
use equipay_auth::{AuthContext, AuthRejection};
use equipay_core::config::GateConfig;
use equipay_core::types::ClientPlatform;
use equipay_entity::session::Session;
use equipay_entity::user::User;

use super::token::extract_token;

/// Outcome of a request that was allowed through.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    /// The path is exempt. No identity is attached.
    Exempt,
    /// The request authenticated as this caller.
    Authenticated(Box<AuthContext>),
}

/// The parts of an inbound request the gate reads.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    /// Request URI (path and query).
    pub uri: &'a Uri,
    /// Request headers.
    pub headers: &'a HeaderMap,
    /// Transport-level peer address, when known.
    pub peer: Option<IpAddr>,
}

/// Authenticates requests against the session store.
#[derive(Debug)]
pub struct AuthGate {
    config: GateConfig,
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    limiter: SessionLimiter,
}

impl AuthGate {
    /// Creates a gate. The configuration is fixed for the gate's lifetime.
    pub fn new(
        config: GateConfig,
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        if config.refresh_token_rotation {
            warn!("refresh_token_rotation is set but not enforced by the authentication gate");
        }
        let limiter = SessionLimiter::new(Arc::clone(&sessions), Arc::clone(&users));
        Self {
            config,
            codec,
            sessions,
            users,
            limiter,
        }
    }

    /// Runs the full pipeline for one request.
    pub async fn authenticate(&self, req: GateRequest<'_>) -> Result<GateOutcome, AuthRejection> {
        let path = req.uri.path();
        if self.config.is_excluded(path) {
            debug!(path = %path, "Path exempt from authentication");
            return Ok(GateOutcome::Exempt);
        }

        let token = extract_token(&self.config, req.headers, req.uri).ok_or_else(|| {
            debug!(path = %path, "No credentials in any configured location");
            AuthRejection::CredentialsMissing
        })?;

        let session = self.resolve(&token).await?;
        let now = Utc::now();
        self.check_expiry(&session, now)?;

        let platform = classify_platform(req.headers);
        self.verify_fingerprint(&session, &req, platform)?;

        self.record_activity(&session, now).await;

        let user = self.load_user(&session).await?;
        self.enforce_limit(&user, &session).await;

        debug!(
            user_id = session.user_id,
            session_id = %session.session_id,
            platform = %platform,
            path = %path,
            "Request authenticated"
        );

        Ok(GateOutcome::Authenticated(Box::new(AuthContext {
            user_id: session.user_id,
            session_id: session.session_id,
            device_info: session.device_info.clone(),
            user,
            platform,
        })))
    }

    /// Decodes the token and finds the session bound to it.
    async fn resolve(&self, token: &str) -> Result<Session, AuthRejection> {
        let claims = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "Token rejected by codec");
            AuthRejection::from(e)
        })?;

        let session = self
            .sessions
            .find_usable_by_token(token)
            .await
            .map_err(|e| {
                error!(error = %e, "Session lookup failed");
                AuthRejection::Internal
            })?
            .ok_or_else(|| {
                debug!(subject = %claims.sub, "No active session for token");
                AuthRejection::InvalidCredentials
            })?;

        if !claims.is_subject(session.user_id) {
            warn!(
                subject = %claims.sub,
                user_id = session.user_id,
                session_id = %session.session_id,
                "Token subject does not match session owner"
            );
            return Err(AuthRejection::InvalidCredentials);
        }

        Ok(session)
    }

    fn check_expiry(&self, session: &Session, now: DateTime<Utc>) -> Result<(), AuthRejection> {
        if session.is_expired_at(now) {
            info!(
                user_id = session.user_id,
                session_id = %session.session_id,
                expires_at = %session.expires_at,
                "Session expired"
            );
            return Err(AuthRejection::SessionExpired);
        }
        Ok(())
    }

    fn verify_fingerprint(
        &self,
        session: &Session,
        req: &GateRequest<'_>,
        platform: ClientPlatform,
    ) -> Result<(), AuthRejection> {
        let policy = FingerprintPolicy::resolve(&self.config, platform);
        if !policy.verify_ip && !policy.verify_user_agent {
            return Ok(());
        }

        let ip = client_ip(req.headers, req.peer);
        let user_agent = req
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        policy
            .verify(session, &ip, user_agent, platform)
            .map_err(|check| {
                warn!(
                    user_id = session.user_id,
                    session_id = %session.session_id,
                    platform = %platform,
                    check = check.as_str(),
                    "Client fingerprint mismatch"
                );
                AuthRejection::FingerprintMismatch(check)
            })
    }

    async fn record_activity(&self, session: &Session, now: DateTime<Utc>) {
        if let Err(e) = self.sessions.touch(session.session_id, now).await {
            warn!(
                session_id = %session.session_id,
                error = %e,
                "Failed to record session activity"
            );
        }
    }

    async fn load_user(&self, session: &Session) -> Result<User, AuthRejection> {
        self.users
            .find_user(session.user_id)
            .await
            .map_err(|e| {
                error!(user_id = session.user_id, error = %e, "User lookup failed");
                AuthRejection::Internal
            })?
            .ok_or_else(|| {
                warn!(
                    user_id = session.user_id,
                    session_id = %session.session_id,
                    "Session owner no longer exists"
                );
                AuthRejection::InvalidCredentials
            })
    }

    async fn enforce_limit(&self, user: &User, session: &Session) {
        if let Err(e) = self.limiter.enforce_for(user, session).await {
            error!(
                user_id = user.id,
                session_id = %session.session_id,
                error = %e,
                "Session limit enforcement failed"
            );
        }
    }
}
