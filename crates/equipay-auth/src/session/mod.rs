//! Session persistence and issuance.

pub mod issuer;
pub mod memory;
pub mod postgres;
pub mod store;

pub use issuer::{ClientFingerprint, IssuedSession, SessionIssuer};
pub use memory::{MemorySessionStore, MemoryUserStore};
pub use postgres::{PgSessionStore, PgUserStore};
pub use store::{SessionStore, UserStore};
