//! Client IP resolution and fingerprint comparison.
//!
//! Mobile clients roam between networks and update their apps, so for
//! them the IP check only compares the first two octets and the
//! User-Agent check ignores everything after the first `/`.

use std::net::IpAddr;

use http::HeaderMap;

use equipay_core::config::GateConfig;
use equipay_core::types::ClientPlatform;
use equipay_entity::session::Session;

use crate::error::FingerprintCheck;

/// Proxy headers consulted for the client IP, in priority order.
pub const CLIENT_IP_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Resolves the client IP from proxy headers, then the peer address.
///
/// The first header present wins; its first comma-separated value is used.
/// Returns an empty string when nothing is known.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    for name in CLIENT_IP_HEADERS {
        if let Some(value) = headers.get(name) {
            let value = value.to_str().unwrap_or_default();
            return value.split(',').next().unwrap_or_default().trim().to_string();
        }
    }
    peer.map(|ip| ip.to_string()).unwrap_or_default()
}

/// Which fingerprint checks apply to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerprintPolicy {
    /// Compare IP addresses.
    pub verify_ip: bool,
    /// Compare User-Agent strings.
    pub verify_user_agent: bool,
}

impl FingerprintPolicy {
    /// Global flags with the platform's overrides applied on top.
    pub fn resolve(config: &GateConfig, platform: ClientPlatform) -> Self {
        let rule = config
            .platform_specific_rules
            .get(&platform)
            .copied()
            .unwrap_or_default();
        Self {
            verify_ip: rule.verify_ip.unwrap_or(config.verify_ip),
            verify_user_agent: rule.verify_user_agent.unwrap_or(config.verify_user_agent),
        }
    }

    /// Runs the enabled checks against a session. IP is checked first.
    pub fn verify(
        &self,
        session: &Session,
        ip: &str,
        user_agent: &str,
        platform: ClientPlatform,
    ) -> Result<(), FingerprintCheck> {
        if self.verify_ip && !ip_matches(&session.ip_address, ip, platform) {
            return Err(FingerprintCheck::IpAddress);
        }
        if self.verify_user_agent && !user_agent_matches(&session.user_agent, user_agent, platform)
        {
            return Err(FingerprintCheck::UserAgent);
        }
        Ok(())
    }
}

/// Compares a stored IP with the request IP.
pub fn ip_matches(stored: &str, current: &str, platform: ClientPlatform) -> bool {
    if platform.is_mobile() && !stored.is_empty() && !current.is_empty() {
        let stored_parts: Vec<&str> = stored.split('.').collect();
        let current_parts: Vec<&str> = current.split('.').collect();
        if stored_parts.len() >= 2 && current_parts.len() >= 2 {
            return stored_parts[..2] == current_parts[..2];
        }
    }
    stored == current
}

/// Compares a stored User-Agent with the request User-Agent.
pub fn user_agent_matches(stored: &str, current: &str, platform: ClientPlatform) -> bool {
    if !platform.is_mobile() {
        return stored == current;
    }
    if stored.is_empty() || current.is_empty() {
        return false;
    }
    let stored = app_name(stored);
    let current = app_name(current);
    stored.contains(current) || current.contains(stored)
}

fn app_name(user_agent: &str) -> &str {
    user_agent.split('/').next().unwrap_or(user_agent)
}
