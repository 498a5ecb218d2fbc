//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{Duration, Utc};
use http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use equipay_api::AppState;
use equipay_auth::session::{
    ClientFingerprint, IssuedSession, MemorySessionStore, MemoryUserStore,
};
use equipay_core::config::{AppConfig, GateConfig};
use equipay_entity::session::Session;
use equipay_entity::user::User;

/// Signing secret shared by every test app.
pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// User-Agent of a desktop Chrome browser.
pub const WEB_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

/// User-Agent of the iOS app.
pub const IOS_UA: &str = "Equipay/3.2.0 (iPhone; iOS 17.4)";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application state the router was built with
    pub state: AppState,
    /// In-memory session store behind the router
    pub sessions: MemorySessionStore,
    /// In-memory user store behind the router
    pub users: MemoryUserStore,
}

impl TestApp {
    /// Create a test application with the default gate configuration
    pub fn new() -> Self {
        Self::with_gate(|_| {})
    }

    /// Create a test application after adjusting the gate configuration
    pub fn with_gate(configure: impl FnOnce(&mut GateConfig)) -> Self {
        let mut config: AppConfig = serde_json::from_value(json!({
            "database": { "url": "postgres://unused" },
            "auth": { "jwt_secret": SECRET },
        }))
        .expect("Failed to build test config");
        configure(&mut config.auth.gate);

        let sessions = MemorySessionStore::new();
        let users = MemoryUserStore::new();
        let state = AppState::new(
            &config.auth,
            Arc::new(sessions.clone()),
            Arc::new(users.clone()),
            None,
        );
        let router = equipay_api::build_router(state.clone());

        Self {
            router,
            state,
            sessions,
            users,
        }
    }

    /// Create a user with the given concurrent session limit
    pub async fn create_user(&self, id: i64, max_session: i16) -> User {
        let user = User {
            id,
            name: format!("User {id}"),
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            mobile_number: format!("555{id:04}"),
            password: "not-a-real-hash".to_string(),
            max_session,
            is_active: true,
            last_login: None,
            created_at: Utc::now() - Duration::days(10),
        };
        self.users.insert(user.clone()).await;
        user
    }

    /// Issue a session the way the login flow does
    pub async fn login(&self, user_id: i64, ip: &str, user_agent: &str) -> IssuedSession {
        self.state
            .issuer
            .issue(
                user_id,
                ClientFingerprint {
                    ip_address: ip.to_string(),
                    user_agent: user_agent.to_string(),
                    device_info: Some("test device".to_string()),
                },
            )
            .await
            .expect("Failed to issue session")
    }

    /// Apply `change` to a stored session
    pub async fn update_session(&self, session: &Session, change: impl FnOnce(&mut Session)) {
        let mut stored = self
            .sessions
            .get(session.session_id)
            .await
            .expect("Session not found");
        change(&mut stored);
        self.sessions.insert(stored).await;
    }

    /// Whether a stored session is still usable now
    pub async fn is_usable(&self, session: &Session) -> bool {
        self.sessions
            .get(session.session_id)
            .await
            .is_some_and(|s| s.is_usable_at(Utc::now()))
    }

    /// GET `path` with an optional bearer token
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        self.send(req.body(Body::empty()).expect("Failed to build request"))
            .await
    }

    /// Send a prepared request to the test app
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of a JSON error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
