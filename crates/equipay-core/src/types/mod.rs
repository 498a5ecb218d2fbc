//! Shared value types used across crates.

pub mod platform;
pub mod session_limit;
pub mod token_location;

pub use platform::ClientPlatform;
pub use session_limit::SessionLimit;
pub use token_location::TokenLocation;
