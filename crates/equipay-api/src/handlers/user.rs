//! User handlers.

use axum::Json;

use crate::dto::response::UserResponse;
use crate::extractors::AuthUser;

/// GET /api/users/me
pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&auth.user))
}
