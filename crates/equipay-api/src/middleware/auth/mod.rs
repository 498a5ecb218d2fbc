//! Authentication middleware.
//!
//! Runs the [`AuthGate`] for every request and, on success, inserts the
//! caller's [`AuthContext`](equipay_auth::AuthContext) into the request
//! extensions for the `AuthUser` extractor.

pub mod gate;
pub mod token;

use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use tracing::error;

use equipay_auth::AuthRejection;

use crate::error::ApiError;
use crate::state::AppState;

pub use gate::{AuthGate, GateOutcome, GateRequest};

/// Middleware entry point: `from_fn_with_state(state, authenticate)`.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let outcome = {
        let gate_request = GateRequest {
            uri: request.uri(),
            headers: request.headers(),
            peer,
        };
        AssertUnwindSafe(state.gate.authenticate(gate_request))
            .catch_unwind()
            .await
    };

    match outcome {
        Ok(Ok(GateOutcome::Exempt)) => next.run(request).await,
        Ok(Ok(GateOutcome::Authenticated(context))) => {
            request.extensions_mut().insert(*context);
            next.run(request).await
        }
        Ok(Err(rejection)) => ApiError::from(rejection).into_response(),
        Err(_) => {
            error!(path = %request.uri().path(), "Authentication gate panicked");
            ApiError::from(AuthRejection::Internal).into_response()
        }
    }
}
