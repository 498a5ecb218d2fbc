//! # equipay-auth
//!
//! Session-based authentication building blocks for Equipay.
//!
//! ## Modules
//!
//! - `jwt`: signed bearer token issue / verify
//! - `session`: session persistence (Postgres and in-memory) and issuance
//! - `platform`: client platform classification from request headers
//! - `fingerprint`: client IP resolution and IP / User-Agent comparison
//! - `limiter`: per-user concurrent session limit enforcement
//! - `error`: the rejection taxonomy returned by the authentication gate

pub mod context;
pub mod error;
pub mod fingerprint;
pub mod jwt;
pub mod limiter;
pub mod platform;
pub mod session;

pub use context::AuthContext;
pub use error::{AuthRejection, FingerprintCheck, TokenError};
pub use fingerprint::FingerprintPolicy;
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenCodec};
pub use limiter::SessionLimiter;
pub use platform::classify_platform;
pub use session::{
    MemorySessionStore, MemoryUserStore, PgSessionStore, PgUserStore, SessionIssuer,
    SessionStore, UserStore,
};
