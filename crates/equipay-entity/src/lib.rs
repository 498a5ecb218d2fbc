//! # equipay-entity
//!
//! Persisted record types for the Equipay backend. Every struct in this
//! crate represents a database table row or the data needed to insert one.

pub mod session;
pub mod user;
