//! Issue / verify pair built from the auth configuration.

use chrono::Duration;

use equipay_core::config::AuthConfig;

use crate::error::TokenError;

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// A freshly signed token together with its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact serialized token.
    pub token: String,
    /// Claims the token carries.
    pub claims: Claims,
}

/// Signs and verifies access and refresh tokens with one shared secret.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Builds a codec from the `auth` configuration section.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoder: JwtEncoder::new(&config.jwt_secret),
            decoder: JwtDecoder::new(&config.jwt_secret, config.token_leeway_seconds),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes as i64),
            refresh_ttl: Duration::hours(config.refresh_token_ttl_hours as i64),
        }
    }

    /// Issues a token for `subject` with an explicit lifetime.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let (token, claims) = self.encoder.issue(subject, ttl)?;
        Ok(IssuedToken { token, claims })
    }

    /// Issues a token with the configured access lifetime.
    pub fn issue_access(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue(subject, self.access_ttl)
    }

    /// Issues a token with the configured refresh lifetime.
    pub fn issue_refresh(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue(subject, self.refresh_ttl)
    }

    /// Verifies a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.decoder.verify(token)
    }
}
