//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use equipay_auth::jwt::TokenCodec;
use equipay_auth::session::{SessionIssuer, SessionStore, UserStore};
use equipay_core::config::AuthConfig;
use equipay_database::DatabasePool;

use crate::middleware::auth::AuthGate;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when running on in-memory stores
    pub db: Option<DatabasePool>,

    // ── Auth ─────────────────────────────────────────────────
    /// Request authentication pipeline
    pub gate: Arc<AuthGate>,
    /// Token codec
    pub codec: Arc<TokenCodec>,
    /// Session creation for the login flow
    pub issuer: Arc<SessionIssuer>,
    /// Session persistence
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Wires the auth components around the given stores.
    pub fn new(
        auth: &AuthConfig,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        db: Option<DatabasePool>,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(auth));
        let issuer = Arc::new(SessionIssuer::new(
            Arc::clone(&codec),
            Arc::clone(&sessions),
            auth,
        ));
        let gate = Arc::new(AuthGate::new(
            auth.gate.clone(),
            Arc::clone(&codec),
            Arc::clone(&sessions),
            users,
        ));

        Self {
            db,
            gate,
            codec,
            issuer,
            sessions,
        }
    }
}
