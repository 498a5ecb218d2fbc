//! `AuthUser` extractor: reads the identity published by the auth middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use equipay_auth::AuthContext;

use crate::error::ApiError;

/// Authenticated caller available in handlers.
///
/// Rejects with 401 when the route was reached without an identity, which
/// happens on exempt paths.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl std::ops::Deref for AuthUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or(ApiError::NotAuthenticated)
    }
}
