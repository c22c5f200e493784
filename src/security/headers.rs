//! Header manipulation for upstream requests and client responses.
//!
//! # Responsibilities
//! - Reduce outbound request headers to a fixed allowlist
//! - Strip hop-by-hop headers from upstream responses
//!
//! # Design Decisions
//! - The allowlist is a compile-time constant, not request-derived state
//! - Everything outside the allowlist is dropped unconditionally (Host,
//!   Cookie, Authorization, anything a client invents)
//! - Multi-valued headers keep every value in original order

use axum::http::header::{self, HeaderMap, HeaderName};

/// Request headers that survive the upstream rewrite.
pub const ALLOWED_HEADERS: [HeaderName; 4] = [
    HeaderName::from_static("x-forwarded-for"),
    HeaderName::from_static("x-forwarded-host"),
    HeaderName::from_static("x-forwarded-proto"),
    header::USER_AGENT,
];

/// Connection-scoped headers that must not be relayed (RFC 9110 §7.6.1).
const HOP_BY_HOP_HEADERS: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Build a fresh header map holding only allowlisted entries.
pub fn allowlisted_headers(source: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in ALLOWED_HEADERS.iter() {
        for value in source.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP_HEADERS.iter()) {
        headers.remove(name);
    }
}
