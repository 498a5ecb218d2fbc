//! Error types for token handling and request authentication.

use http::StatusCode;
use thiserror::Error;

/// Failure to issue or verify a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The signature does not match the payload.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token could not be parsed.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The token's own `exp` claim has passed.
    #[error("token has expired")]
    Expired,
    /// Signing failed.
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Which part of the client fingerprint failed comparison.
///
/// Only ever logged; never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintCheck {
    /// Request IP does not match the session's IP.
    IpAddress,
    /// Request User-Agent does not match the session's User-Agent.
    UserAgent,
}

impl FingerprintCheck {
    /// Short name for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IpAddress => "ip_address",
            Self::UserAgent => "user_agent",
        }
    }
}

/// Terminal failure of the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthRejection {
    /// No token in any configured location.
    #[error("Authentication credentials missing")]
    CredentialsMissing,
    /// Bad signature, malformed token, unknown session, or subject mismatch.
    #[error("Invalid authentication credentials")]
    InvalidCredentials,
    /// The session is past `expires_at`.
    #[error("Session expired")]
    SessionExpired,
    /// IP or User-Agent comparison failed.
    #[error("Client fingerprint mismatch")]
    FingerprintMismatch(FingerprintCheck),
    /// Any unexpected failure inside the gate.
    #[error("Authentication error")]
    Internal,
}

impl AuthRejection {
    /// HTTP status the rejection maps to. Never 5xx.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::FingerprintMismatch(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::CredentialsMissing => "CREDENTIALS_MISSING",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::FingerprintMismatch(_) => "FINGERPRINT_MISMATCH",
            Self::Internal => "AUTHENTICATION_ERROR",
        }
    }
}

impl From<TokenError> for AuthRejection {
    fn from(_: TokenError) -> Self {
        Self::InvalidCredentials
    }
}
