//! # equipay-database
//!
//! PostgreSQL connection management and concrete repositories for the
//! user and session tables.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
