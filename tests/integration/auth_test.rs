//! Integration tests for the authentication gate.

mod helpers;

use axum::body::Body;
use chrono::{Duration, Utc};
use http::{Request, StatusCode};

use equipay_core::config::PlatformRule;
use equipay_core::types::ClientPlatform;
use equipay_entity::session::CreateSession;
use equipay_auth::session::SessionStore;

use helpers::{IOS_UA, TestApp, WEB_UA};

#[tokio::test]
async fn test_exempt_path_makes_no_store_calls() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "not_configured");
    assert_eq!(app.sessions.call_count(), 0);
    assert_eq!(app.users.call_count(), 0);
}

#[tokio::test]
async fn test_missing_token_rejected_with_challenge() {
    let app = TestApp::new();

    let response = app.get("/api/users/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "CREDENTIALS_MISSING");
    assert_eq!(response.headers["www-authenticate"], "Bearer");
    assert_eq!(app.sessions.call_count(), 0);
}

#[tokio::test]
async fn test_valid_session_publishes_identity() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;

    let response = app.get("/api/users/me", Some(&issued.access_token)).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["id"], 1);
    assert_eq!(response.body["username"], "user1");
    assert!(response.body.get("password").is_none());
}

#[tokio::test]
async fn test_authenticated_request_records_activity() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;
    assert!(issued.session.last_activity.is_none());

    let before = Utc::now();
    let response = app.get("/api/users/me", Some(&issued.access_token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let stored = app.sessions.get(issued.session.session_id).await.unwrap();
    assert!(stored.last_activity.is_some_and(|at| at >= before));
}

#[tokio::test]
async fn test_token_without_session_is_invalid() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let orphan = app.state.codec.issue_access("1").unwrap();

    let response = app.get("/api/users/me", Some(&orphan.token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
    assert_eq!(response.headers["www-authenticate"], "Bearer");
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = TestApp::new();

    let response = app.get("/api/users/me", Some("definitely-not-a-jwt")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
    assert_eq!(app.sessions.call_count(), 0);
}

#[tokio::test]
async fn test_subject_mismatch_is_invalid() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    app.create_user(2, 3).await;

    let foreign = app.state.codec.issue_access("2").unwrap();
    app.sessions
        .create(CreateSession {
            user_id: 1,
            access_token: foreign.token.clone(),
            refresh_token: "unused".to_string(),
            user_agent: WEB_UA.to_string(),
            ip_address: "10.0.0.8".to_string(),
            device_info: None,
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();

    let response = app.get("/api/users/me", Some(&foreign.token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_expired_session_rejected() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;
    app.update_session(&issued.session, |s| {
        s.expires_at = Utc::now() - Duration::seconds(1);
    })
    .await;

    let response = app.get("/api/users/me", Some(&issued.access_token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "SESSION_EXPIRED");
    assert_eq!(response.headers["www-authenticate"], "Bearer");
}

#[tokio::test]
async fn test_cookie_and_query_tokens_accepted() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;

    let via_cookie = Request::builder()
        .uri("/api/users/me")
        .header("Cookie", format!("Authorization={}", issued.access_token))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(via_cookie).await.status, StatusCode::OK);

    let via_query = app
        .get(&format!("/api/users/me?Authorization={}", issued.access_token), None)
        .await;
    assert_eq!(via_query.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_scheme_prefix_accepted() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;

    let req = Request::builder()
        .uri("/api/users/me")
        .header("Authorization", format!("Token {}", issued.access_token))
        .body(Body::empty())
        .unwrap();

    assert_eq!(app.send(req).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_mobile_ip_subnet_match_allowed() {
    let app = TestApp::with_gate(|gate| {
        gate.platform_specific_rules.insert(
            ClientPlatform::MobileIos,
            PlatformRule {
                verify_ip: Some(true),
                verify_user_agent: Some(true),
            },
        );
    });
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.1.5", "Equipay/3.1.0 (iPhone; iOS 17.3)").await;

    let req = Request::builder()
        .uri("/api/auth/session")
        .header("Authorization", format!("Bearer {}", issued.access_token))
        .header("X-Client-Platform", "iOS")
        .header("X-Forwarded-For", "10.0.1.200, 172.16.0.1")
        .header("User-Agent", IOS_UA)
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["platform"], "mobile_ios");
    assert_eq!(response.body["device_info"], "test device");
    assert_eq!(
        response.body["session_id"],
        issued.session.session_id.to_string()
    );
}

#[tokio::test]
async fn test_web_ip_mismatch_forbidden() {
    let app = TestApp::with_gate(|gate| gate.verify_ip = true);
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.1.5", WEB_UA).await;

    let req = Request::builder()
        .uri("/api/users/me")
        .header("Authorization", format!("Bearer {}", issued.access_token))
        .header("X-Forwarded-For", "10.0.2.5")
        .header("User-Agent", WEB_UA)
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FINGERPRINT_MISMATCH");
    assert_eq!(response.body["message"], "Client fingerprint mismatch");
    assert!(response.headers.get("www-authenticate").is_none());
}

#[tokio::test]
async fn test_web_user_agent_mismatch_forbidden() {
    let app = TestApp::with_gate(|gate| gate.verify_user_agent = true);
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.1.5", WEB_UA).await;

    let req = Request::builder()
        .uri("/api/users/me")
        .header("Authorization", format!("Bearer {}", issued.access_token))
        .header(
            "User-Agent",
            "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/124.0",
        )
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FINGERPRINT_MISMATCH");
}

#[tokio::test]
async fn test_store_failure_is_authentication_error() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;
    app.sessions.set_failing(true);

    let response = app.get("/api/users/me", Some(&issued.access_token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION_ERROR");
    assert_eq!(response.body["message"], "Authentication error");
}

#[tokio::test]
async fn test_user_lookup_failure_is_authentication_error() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;
    app.users.set_failing(true);

    let response = app.get("/api/users/me", Some(&issued.access_token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION_ERROR");
    assert_eq!(response.body["message"], "Authentication error");
    assert_eq!(response.headers["www-authenticate"], "Bearer");
    assert_eq!(app.users.call_count(), 1);
}

#[tokio::test]
async fn test_panic_during_authentication_is_authentication_error() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;
    app.users.set_panicking(true);

    let response = app.get("/api/users/me", Some(&issued.access_token)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION_ERROR");
    assert_eq!(response.body["message"], "Authentication error");
    assert_eq!(response.headers["www-authenticate"], "Bearer");

    // The router keeps serving once the switch is off.
    app.users.set_panicking(false);
    let response = app.get("/api/users/me", Some(&issued.access_token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    app.create_user(1, 3).await;
    let issued = app.login(1, "10.0.0.8", WEB_UA).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header("Authorization", format!("Bearer {}", issued.access_token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::OK);

    let again = app.get("/api/users/me", Some(&issued.access_token)).await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);
    assert_eq!(again.error_code(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_handler_on_exempt_path_requires_identity() {
    let app = TestApp::with_gate(|gate| gate.exclude_paths.push("/api/users/me".to_string()));

    let response = app.get("/api/users/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "NOT_AUTHENTICATED");
    assert_eq!(app.sessions.call_count(), 0);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::new();

    for response in [
        app.get("/health", None).await,
        app.get("/api/users/me", None).await,
    ] {
        assert_eq!(response.headers["x-content-type-options"], "nosniff");
        assert_eq!(response.headers["x-xss-protection"], "1; mode=block");
        assert_eq!(response.headers["x-frame-options"], "DENY");
        assert_eq!(
            response.headers["strict-transport-security"],
            "max-age=31536000; includeSubDomains"
        );
    }
}
