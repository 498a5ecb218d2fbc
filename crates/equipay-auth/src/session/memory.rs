//! In-memory stores using a Tokio mutex.
//!
//! Used by tests and local runs without a database. Each store counts the
//! calls made against it so callers can assert that a code path stayed
//! away from storage.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use equipay_core::error::AppError;
use equipay_core::result::AppResult;
use equipay_entity::session::{CreateSession, Session};
use equipay_entity::user::User;

use super::store::{SessionStore, UserStore};

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    calls: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a session directly. Not counted as a call.
    pub async fn insert(&self, session: Session) {
        self.sessions.lock().await.insert(session.session_id, session);
    }

    /// Current copy of a session. Not counted as a call.
    pub async fn get(&self, session_id: Uuid) -> Option<Session> {
        self.sessions.lock().await.get(&session_id).cloned()
    }

    /// Number of trait calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent trait call fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    /// Makes only mutating calls (`touch`, `revoke`, `create`, `deactivate`) fail.
    pub fn set_failing_writes(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn record_read(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::database("session store unavailable"));
        }
        Ok(())
    }

    fn record_write(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("session store rejected write"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_usable_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        self.record_read()?;
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .values()
            .find(|s| s.is_active && s.access_token == token)
            .cloned())
    }

    async fn touch(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.record_write()?;
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&session_id) {
            if session.last_activity.is_none_or(|prev| prev < at) {
                session.last_activity = Some(at);
            }
        }
        Ok(())
    }

    async fn list_usable(
        &self,
        user_id: i64,
        excluding: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        self.record_read()?;
        let sessions = self.sessions.lock().await;
        let mut usable: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id == user_id && s.session_id != excluding && s.is_usable_at(now))
            .cloned()
            .collect();
        usable.sort_by_key(|s| (s.last_activity, s.created_at));
        Ok(usable)
    }

    async fn revoke(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.record_write()?;
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&session_id) {
            if session.expires_at > at {
                session.expires_at = at;
            }
        }
        Ok(())
    }

    async fn create(&self, data: CreateSession) -> AppResult<Session> {
        self.record_write()?;
        let session = Session {
            session_id: Uuid::new_v4(),
            user_id: data.user_id,
            access_token: data.access_token,
            refresh_token: data.refresh_token,
            user_agent: data.user_agent,
            ip_address: data.ip_address,
            device_info: data.device_info,
            expires_at: data.expires_at,
            last_activity: None,
            is_active: true,
            created_at: Utc::now(),
        };
        self.sessions
            .lock()
            .await
            .insert(session.session_id, session.clone());
        Ok(session)
    }

    async fn deactivate(&self, session_id: Uuid) -> AppResult<()> {
        self.record_write()?;
        if let Some(session) = self.sessions.lock().await.get_mut(&session_id) {
            session.is_active = false;
        }
        Ok(())
    }
}

/// In-memory user store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<i64, User>>>,
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    panicking: Arc<AtomicBool>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user. Not counted as a call.
    pub async fn insert(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }

    /// Number of trait calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every lookup return a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every lookup panic, standing in for a bug inside a store.
    pub fn set_panicking(&self, panicking: bool) {
        self.panicking.store(panicking, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user(&self, user_id: i64) -> AppResult<Option<User>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking.load(Ordering::SeqCst) {
            panic!("user store panicked looking up user {user_id}");
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::database("user store unavailable"));
        }
        Ok(self.users.lock().await.get(&user_id).cloned())
    }
}
