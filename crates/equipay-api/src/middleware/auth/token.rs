//! Bearer token extraction from header, cookie, and query string.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use axum_extra::extract::cookie::CookieJar;

use equipay_core::config::GateConfig;
use equipay_core::types::TokenLocation;

/// Header prefixes stripped before the token value. Matched case-sensitively.
const SCHEMES: [&str; 2] = ["Bearer ", "Token "];

/// Searches the configured locations in order; the first non-empty value wins.
pub fn extract_token(config: &GateConfig, headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let name = config.token_name.as_str();
    config.token_location.iter().find_map(|location| {
        let value = match location {
            TokenLocation::Header => from_header(headers, name),
            TokenLocation::Cookie => from_cookie(headers, name),
            TokenLocation::Query => from_query(uri, name),
        }?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn from_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(name)?.to_str().ok()?;
    let token = SCHEMES
        .iter()
        .find_map(|scheme| raw.strip_prefix(scheme))
        .unwrap_or(raw);
    Some(token.to_string())
}

fn from_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|cookie| cookie.value().to_string())
}

fn from_query(uri: &Uri, name: &str) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params.get(name).cloned()
}
