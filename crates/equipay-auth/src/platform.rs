//! Client platform classification.
//!
//! An explicit `X-Client-Platform` header wins when it names a known
//! platform. Otherwise the User-Agent is inspected. Both are matched
//! case-insensitively by substring.

use http::HeaderMap;
use http::header::USER_AGENT;

use equipay_core::types::ClientPlatform;

/// Header a client may set to declare its platform.
pub const CLIENT_PLATFORM_HEADER: &str = "x-client-platform";

/// Classifies the client that sent `headers`.
pub fn classify_platform(headers: &HeaderMap) -> ClientPlatform {
    if let Some(declared) = header_lower(headers, CLIENT_PLATFORM_HEADER) {
        if let Some(platform) = from_declared(&declared) {
            return platform;
        }
    }

    match header_lower(headers, USER_AGENT.as_str()) {
        Some(ua) => from_user_agent(&ua),
        None => ClientPlatform::Unknown,
    }
}

fn from_declared(value: &str) -> Option<ClientPlatform> {
    if value.contains("ios") {
        Some(ClientPlatform::MobileIos)
    } else if value.contains("android") {
        Some(ClientPlatform::MobileAndroid)
    } else if value.contains("web") {
        Some(ClientPlatform::Web)
    } else if value.contains("desktop") {
        Some(ClientPlatform::Desktop)
    } else {
        None
    }
}

fn from_user_agent(ua: &str) -> ClientPlatform {
    let any = |needles: &[&str]| needles.iter().any(|n| ua.contains(n));

    if any(&["iphone", "ipad", "ios"]) {
        ClientPlatform::MobileIos
    } else if ua.contains("android") {
        ClientPlatform::MobileAndroid
    } else if ua.contains("mozilla") && any(&["chrome", "firefox", "safari"]) {
        ClientPlatform::Web
    } else if any(&["electron", "macos", "windows nt"]) {
        ClientPlatform::Desktop
    } else {
        ClientPlatform::Unknown
    }
}

fn header_lower(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase)
}
