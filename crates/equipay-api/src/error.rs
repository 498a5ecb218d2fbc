//! Maps domain errors and auth rejections to HTTP responses.

use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use equipay_auth::AuthRejection;
use equipay_core::error::AppError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Every error a handler or middleware in this crate can respond with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The authentication gate rejected the request.
    #[error(transparent)]
    Auth(#[from] AuthRejection),
    /// A handler needed an identity but none was published.
    #[error("Not authenticated")]
    NotAuthenticated,
    /// Domain or storage failure.
    #[error(transparent)]
    App(#[from] AppError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Auth(rejection) => (
                rejection.status_code(),
                rejection.reason(),
                rejection.to_string(),
            ),
            Self::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                self.to_string(),
            ),
            Self::App(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ApiErrorResponse {
            error: code.to_string(),
            message,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
