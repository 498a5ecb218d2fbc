//! Per-user concurrent session limit.
//!
//! Runs after a request has authenticated. When the user holds more
//! usable sessions than `max_session` allows, the least recently active
//! ones (never-active first) are revoked so that the current session
//! plus the survivors fit. The current session is never revoked.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use equipay_core::result::AppResult;
use equipay_core::types::SessionLimit;
use equipay_entity::session::Session;
use equipay_entity::user::User;

use crate::session::{SessionStore, UserStore};

/// Enforces `users.max_session` against stored sessions.
#[derive(Debug, Clone)]
pub struct SessionLimiter {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
}

impl SessionLimiter {
    /// Creates a limiter over the given stores.
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserStore>) -> Self {
        Self { sessions, users }
    }

    /// Loads the session's owner and enforces their limit.
    ///
    /// Returns the number of sessions revoked. A missing user revokes nothing.
    pub async fn enforce(&self, current: &Session) -> AppResult<usize> {
        match self.users.find_user(current.user_id).await? {
            Some(user) => self.enforce_for(&user, current).await,
            None => {
                warn!(user_id = current.user_id, "Session limit skipped: user not found");
                Ok(0)
            }
        }
    }

    /// Enforces `user`'s limit, keeping `current` alive.
    pub async fn enforce_for(&self, user: &User, current: &Session) -> AppResult<usize> {
        let limit = SessionLimit::from_max_session(user.max_session);
        if limit == SessionLimit::Unlimited {
            return Ok(0);
        }

        let now = Utc::now();
        let mut others = self
            .sessions
            .list_usable(user.id, current.session_id, now)
            .await?;

        let excess = limit.excess(others.len() as u32) as usize;
        if excess == 0 {
            return Ok(0);
        }

        // Stores already order this way; sorting again keeps the contract local.
        others.sort_by_key(|s| (s.last_activity, s.created_at));

        for victim in others.iter().take(excess) {
            self.sessions.revoke(victim.session_id, now).await?;
            info!(
                user_id = user.id,
                session_id = %victim.session_id,
                kept_session_id = %current.session_id,
                "Session revoked by concurrent session limit"
            );
        }

        Ok(excess)
    }
}
