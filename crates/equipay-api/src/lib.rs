//! # equipay-api
//!
//! HTTP API layer for Equipay built on Axum.
//!
//! Provides the authentication gate middleware, security headers, request
//! logging, the `AuthUser` extractor, error mapping, and the handlers that
//! read the published identity.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
