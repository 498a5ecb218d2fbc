//! Integration tests for concurrent session limits.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;

use equipay_auth::session::SessionStore;
use uuid::Uuid;

use helpers::{TestApp, WEB_UA};

#[tokio::test]
async fn test_least_recently_active_session_evicted() {
    let app = TestApp::new();
    app.create_user(1, 2).await;

    let first = app.login(1, "10.0.0.1", WEB_UA).await;
    let second = app.login(1, "10.0.0.2", WEB_UA).await;
    let now = Utc::now();
    app.update_session(&first.session, |s| {
        s.last_activity = Some(now - Duration::minutes(30))
    })
    .await;
    app.update_session(&second.session, |s| {
        s.last_activity = Some(now - Duration::minutes(5))
    })
    .await;

    let third = app.login(1, "10.0.0.3", WEB_UA).await;
    let response = app.get("/api/users/me", Some(&third.access_token)).await;
    assert_eq!(response.status, StatusCode::OK);

    assert!(!app.is_usable(&first.session).await);
    assert!(app.is_usable(&second.session).await);
    assert!(app.is_usable(&third.session).await);

    let evicted = app.get("/api/users/me", Some(&first.access_token)).await;
    assert_eq!(evicted.status, StatusCode::UNAUTHORIZED);
    assert_eq!(evicted.error_code(), "SESSION_EXPIRED");
}

#[tokio::test]
async fn test_usable_sessions_settle_under_limit() {
    let app = TestApp::new();
    app.create_user(7, 2).await;

    let mut issued = Vec::new();
    for i in 0..5 {
        let session = app.login(7, &format!("10.0.0.{i}"), WEB_UA).await;
        let response = app.get("/api/users/me", Some(&session.access_token)).await;
        assert_eq!(response.status, StatusCode::OK);
        issued.push(session);
    }

    let usable = app
        .sessions
        .list_usable(7, Uuid::nil(), Utc::now())
        .await
        .unwrap();
    assert!(usable.len() <= 2, "{} usable sessions", usable.len());

    let last = issued.last().unwrap();
    assert!(app.is_usable(&last.session).await);
}

#[tokio::test]
async fn test_unlimited_user_keeps_all_sessions() {
    let app = TestApp::new();
    app.create_user(3, 0).await;

    let sessions = [
        app.login(3, "10.0.0.1", WEB_UA).await,
        app.login(3, "10.0.0.2", WEB_UA).await,
        app.login(3, "10.0.0.3", WEB_UA).await,
    ];
    for s in &sessions {
        assert_eq!(
            app.get("/api/users/me", Some(&s.access_token)).await.status,
            StatusCode::OK
        );
    }
    for s in &sessions {
        assert!(app.is_usable(&s.session).await);
    }
}

#[tokio::test]
async fn test_write_failures_do_not_block_request() {
    let app = TestApp::new();
    app.create_user(1, 1).await;
    let older = app.login(1, "10.0.0.1", WEB_UA).await;
    let current = app.login(1, "10.0.0.2", WEB_UA).await;

    // Touch and revoke both fail; lookups still work.
    app.sessions.set_failing_writes(true);

    let response = app.get("/api/users/me", Some(&current.access_token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.is_usable(&older.session).await);

    let stored = app.sessions.get(current.session.session_id).await.unwrap();
    assert!(stored.last_activity.is_none());
}
