//! # equipay-core
//!
//! Core crate for the Equipay backend. Contains configuration schemas,
//! shared value types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Equipay crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
