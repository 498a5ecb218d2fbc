//! Route definitions for the Equipay HTTP API.
//!
//! Layer order, outermost first: security headers, tracing, request
//! logging, authentication gate, routes.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::security_headers::with_security_headers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(auth_routes()).merge(user_routes());

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .layer(TraceLayer::new_for_http());

    with_security_headers(router).with_state(state)
}

/// Current session and logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/session", get(handlers::auth::current_session))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Authenticated user profile
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(handlers::user::me))
}
