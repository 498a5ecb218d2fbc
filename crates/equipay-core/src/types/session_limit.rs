//! Session limit resolution types.

use serde::{Deserialize, Serialize};

/// Resolved concurrent-session limit for a user.
///
/// Derived from the user's `max_session` column: any value `<= 0`
/// disables the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionLimit {
    /// A fixed maximum number of concurrent sessions.
    Fixed(u32),
    /// No per-user limit.
    Unlimited,
}

impl SessionLimit {
    /// Builds a limit from a stored `max_session` value.
    pub fn from_max_session(max_session: i16) -> Self {
        if max_session <= 0 {
            Self::Unlimited
        } else {
            Self::Fixed(max_session as u32)
        }
    }

    /// How many of `other_count` existing sessions must go so that they plus
    /// one new session fit under the limit.
    pub fn excess(&self, other_count: u32) -> u32 {
        match self {
            Self::Fixed(max) if other_count >= *max => other_count - max + 1,
            _ => 0,
        }
    }
}
