//! Coarse client platform categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The category of client that issued a request.
///
/// Used only to select how strictly a session's client fingerprint is
/// compared; never a security boundary on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientPlatform {
    /// Browser client.
    Web,
    /// iPhone / iPad app.
    MobileIos,
    /// Android app.
    MobileAndroid,
    /// Desktop app (Electron, native macOS / Windows).
    Desktop,
    /// Nothing recognizable in the request headers.
    Unknown,
}

impl ClientPlatform {
    /// Returns the wire name used in configuration and request context.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::MobileIos => "mobile_ios",
            Self::MobileAndroid => "mobile_android",
            Self::Desktop => "desktop",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this is one of the mobile categories.
    pub fn is_mobile(&self) -> bool {
        matches!(self, Self::MobileIos | Self::MobileAndroid)
    }
}

impl fmt::Display for ClientPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
