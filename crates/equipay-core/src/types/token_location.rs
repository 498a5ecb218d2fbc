//! Where a bearer token may be carried on an inbound request.

use serde::{Deserialize, Serialize};

/// A transport location searched for the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenLocation {
    /// A request header named by `token_name`.
    Header,
    /// A cookie named by `token_name`.
    Cookie,
    /// A query parameter named by `token_name`.
    Query,
}
