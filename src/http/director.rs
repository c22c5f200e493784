//! Upstream request rewriting.
//!
//! # Responsibilities
//! - Parse the upstream base URL once at startup (fatal on failure)
//! - Point each outbound request at the upstream scheme and authority
//! - Join base path and request path with a single slash
//! - Join base query and request query with `&`
//! - Replace headers with the allowlisted subset and force `Host`
//!
//! # Design Decisions
//! - Pure: no I/O, no shared mutable state
//! - Consumes the incoming request and builds a new one
//! - Paths are joined in their escaped form, as received

use std::str::FromStr;

use axum::{
    body::Body,
    http::{
        header,
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, Uri, Version,
    },
};
use thiserror::Error;
use url::{Position, Url};

use crate::config::UpstreamConfig;
use crate::security::allowlisted_headers;

/// Startup errors for the upstream target.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("parse url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("url {0:?} is not an absolute http url with a host")]
    NotHttp(String),

    #[error("invalid authority in {url:?}: {source}")]
    Authority {
        url: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error("invalid host header value {0:?}")]
    Host(String),
}

/// Fixed upstream location, parsed once from configuration.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
    base_path: String,
    base_query: Option<String>,
    host: HeaderValue,
}

impl UpstreamTarget {
    pub fn parse(url: &str, host: &str) -> Result<Self, UpstreamError> {
        let parsed = Url::parse(url).map_err(|source| UpstreamError::Url {
            url: url.to_string(),
            source,
        })?;

        if parsed.scheme() != "http" || !parsed.has_host() {
            return Err(UpstreamError::NotHttp(url.to_string()));
        }

        let authority = Authority::from_str(&parsed[Position::BeforeHost..Position::AfterPort])
            .map_err(|source| UpstreamError::Authority {
                url: url.to_string(),
                source,
            })?;

        let host =
            HeaderValue::from_str(host).map_err(|_| UpstreamError::Host(host.to_string()))?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            base_path: parsed.path().to_string(),
            base_query: parsed.query().map(str::to_string),
            host,
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        Self::parse(&config.url, &config.host)
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

/// Rewrites incoming requests so they target the upstream.
#[derive(Debug, Clone)]
pub struct UpstreamDirector {
    target: UpstreamTarget,
}

impl UpstreamDirector {
    pub fn new(target: UpstreamTarget) -> Self {
        Self { target }
    }

    /// Outbound URI for an incoming (prefix-stripped) URI.
    pub fn rewrite_uri(&self, incoming: &Uri) -> Result<Uri, axum::http::Error> {
        let path = single_joining_slash(&self.target.base_path, incoming.path());
        let path_and_query = match join_query(self.target.base_query.as_deref(), incoming.query()) {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        };

        Uri::builder()
            .scheme(self.target.scheme.clone())
            .authority(self.target.authority.clone())
            .path_and_query(PathAndQuery::from_str(&path_and_query)?)
            .build()
    }

    /// Build the outbound request; the body is moved through untouched.
    pub fn direct(&self, request: Request<Body>) -> Result<Request<Body>, axum::http::Error> {
        let (parts, body) = request.into_parts();
        let uri = self.rewrite_uri(&parts.uri)?;

        let mut headers = allowlisted_headers(&parts.headers);
        headers.insert(header::HOST, self.target.host.clone());

        let mut outbound = Request::builder()
            .method(parts.method)
            .version(Version::HTTP_11)
            .uri(uri)
            .body(body)?;
        *outbound.headers_mut() = headers;

        Ok(outbound)
    }
}

/// Join two paths so exactly one slash separates them.
pub fn single_joining_slash(a: &str, b: &str) -> String {
    match (a.ends_with('/'), b.starts_with('/')) {
        (true, true) => format!("{}{}", a, &b[1..]),
        (false, false) => format!("{}/{}", a, b),
        _ => format!("{}{}", a, b),
    }
}

/// Join two raw query strings with `&` when both are non-empty.
pub fn join_query(base: Option<&str>, incoming: Option<&str>) -> Option<String> {
    let base = base.filter(|q| !q.is_empty());
    let incoming = incoming.filter(|q| !q.is_empty());
    match (base, incoming) {
        (Some(a), Some(b)) => Some(format!("{}&{}", a, b)),
        (Some(q), None) | (None, Some(q)) => Some(q.to_string()),
        (None, None) => None,
    }
}
