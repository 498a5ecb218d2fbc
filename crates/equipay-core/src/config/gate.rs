//! Authentication gate configuration.
//!
//! This is the settings surface consumed by the request authentication
//! pipeline. It is loaded once at startup and handed to the gate by value;
//! nothing here is mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ClientPlatform, TokenLocation};

/// Request authentication pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Path prefixes that bypass authentication entirely.
    #[serde(default = "default_exclude_paths")]
    pub exclude_paths: Vec<String>,
    /// Token search order. The first non-empty value wins.
    #[serde(default = "default_token_location")]
    pub token_location: Vec<TokenLocation>,
    /// Header, cookie, and query parameter name carrying the token.
    #[serde(default = "default_token_name")]
    pub token_name: String,
    /// Compare the request IP against the session's stored IP.
    #[serde(default)]
    pub verify_ip: bool,
    /// Compare the request User-Agent against the session's stored one.
    #[serde(default)]
    pub verify_user_agent: bool,
    /// Per-platform overrides of `verify_ip` / `verify_user_agent`.
    #[serde(default)]
    pub platform_specific_rules: HashMap<ClientPlatform, PlatformRule>,
    /// Reserved. Accepted and logged, not enforced.
    #[serde(default)]
    pub refresh_token_rotation: bool,
}

/// Fingerprint verification overrides for one platform.
///
/// An absent field falls back to the global flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRule {
    /// Override for `verify_ip`.
    #[serde(default)]
    pub verify_ip: Option<bool>,
    /// Override for `verify_user_agent`.
    #[serde(default)]
    pub verify_user_agent: Option<bool>,
}

impl GateConfig {
    /// Whether `path` starts with any configured exemption prefix.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_paths
            .iter()
            .any(|prefix| !prefix.is_empty() && path.starts_with(prefix.as_str()))
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            exclude_paths: default_exclude_paths(),
            token_location: default_token_location(),
            token_name: default_token_name(),
            verify_ip: false,
            verify_user_agent: false,
            platform_specific_rules: HashMap::new(),
            refresh_token_rotation: false,
        }
    }
}

fn default_exclude_paths() -> Vec<String> {
    ["/health", "/docs", "/redoc", "/openapi.json", "/api/users/register"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_token_location() -> Vec<TokenLocation> {
    vec![TokenLocation::Header, TokenLocation::Cookie, TokenLocation::Query]
}

fn default_token_name() -> String {
    "Authorization".to_string()
}
