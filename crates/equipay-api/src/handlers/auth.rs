//! Session handlers for the authenticated caller.

use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::dto::response::{MessageResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/auth/session
pub async fn current_session(auth: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id: auth.session_id,
        user_id: auth.user_id,
        platform: auth.platform,
        device_info: auth.device_info.clone(),
    })
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sessions.deactivate(auth.session_id).await?;

    info!(
        user_id = auth.user_id,
        session_id = %auth.session_id,
        "User logged out"
    );

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
