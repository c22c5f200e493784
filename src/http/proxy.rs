//! Reverse proxy transport for the API subtree.
//!
//! # Responsibilities
//! - Apply the upstream director to each request
//! - Append the peer address to `X-Forwarded-For`
//! - Send the request over a pooled hyper-util client
//! - Hand the response to the observer, then stream it back
//!
//! # Design Decisions
//! - Bodies stream in both directions; nothing is buffered
//! - No retries: a failed request is terminal (502)
//! - Overall deadline comes from the server's timeout layer

use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, OriginalUri, State},
    http::{header::HeaderName, HeaderMap, HeaderValue, Request},
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::ProxyConfig;
use crate::http::director::UpstreamDirector;
use crate::http::observer::ResponseObserver;
use crate::http::response;
use crate::observability::metrics;
use crate::security::strip_hop_by_hop;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Forwards filtered API requests to the upstream.
#[derive(Clone)]
pub struct ReverseProxy {
    client: Client<HttpConnector, Body>,
    director: UpstreamDirector,
    observer: ResponseObserver,
    append_forwarded_for: bool,
}

impl ReverseProxy {
    pub fn new(director: UpstreamDirector, config: &ProxyConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            director,
            observer: ResponseObserver,
            append_forwarded_for: config.upstream.append_forwarded_for,
        }
    }

    /// Proxy one request and return the upstream response.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let start = Instant::now();

        let original_path = request
            .extensions()
            .get::<OriginalUri>()
            .map(|uri| uri.path().to_string())
            .unwrap_or_else(|| request.uri().path().to_string());
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let mut outbound = match self.director.direct(request) {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::error!(path = %original_path, error = %e, "Failed to rewrite request");
                metrics::record_upstream(None, start);
                return response::bad_gateway();
            }
        };

        if self.append_forwarded_for {
            if let Some(ip) = peer {
                append_forwarded_for(outbound.headers_mut(), ip);
            }
        }

        let upstream_path = outbound.uri().path().to_string();
        tracing::debug!(
            path = %original_path,
            upstream = %outbound.uri(),
            method = %outbound.method(),
            "Proxying request"
        );

        match self.client.request(outbound).await {
            Ok(upstream) => {
                let status = upstream.status();
                self.observer.observe(status, &original_path, &upstream_path);
                metrics::record_upstream(Some(status.as_u16()), start);

                let (mut parts, body): (_, hyper::body::Incoming) = upstream.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(path = %original_path, error = %e, "Upstream error");
                metrics::record_upstream(None, start);
                response::bad_gateway()
            }
        }
    }
}

/// Add `ip` after any existing `X-Forwarded-For` entries, as one header.
///
/// Prior values are joined as raw bytes, so entries that are not UTF-8 survive.
pub fn append_forwarded_for(headers: &mut HeaderMap, ip: IpAddr) {
    let mut chain: Vec<u8> = Vec::new();
    for value in headers.get_all(&X_FORWARDED_FOR) {
        chain.extend_from_slice(value.as_bytes());
        chain.extend_from_slice(b", ");
    }
    chain.extend_from_slice(ip.to_string().as_bytes());

    if let Ok(value) = HeaderValue::from_bytes(&chain) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

/// Axum handler that forwards everything it receives.
pub async fn proxy_handler(State(proxy): State<ReverseProxy>, request: Request<Body>) -> Response {
    proxy.forward(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::director::UpstreamTarget;
    use axum::http::StatusCode;

    #[test]
    fn test_append_forwarded_for() {
        let mut headers = HeaderMap::new();
        append_forwarded_for(&mut headers, "192.0.2.1".parse().unwrap());
        assert_eq!(headers["x-forwarded-for"], "192.0.2.1");

        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));
        append_forwarded_for(&mut headers, "192.0.2.1".parse().unwrap());
        let values: Vec<_> = headers.get_all("x-forwarded-for").iter().collect();
        assert_eq!(values, ["10.0.0.1, 10.0.0.2, 192.0.2.1"]);
    }

    #[test]
    fn test_append_forwarded_for_keeps_opaque_values() {
        let mut headers = HeaderMap::new();
        headers.append(
            "x-forwarded-for",
            HeaderValue::from_bytes(b"10.0.0.1 \xff").unwrap(),
        );
        append_forwarded_for(&mut headers, "192.0.2.1".parse().unwrap());
        assert_eq!(
            headers["x-forwarded-for"].as_bytes(),
            b"10.0.0.1 \xff, 192.0.2.1"
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let target = UpstreamTarget::parse(&format!("http://{}", addr), "api.local").unwrap();
        let proxy = ReverseProxy::new(UpstreamDirector::new(target), &ProxyConfig::default());

        let request = Request::builder().uri("/server/ping").body(Body::empty()).unwrap();
        let response = proxy.forward(request).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
