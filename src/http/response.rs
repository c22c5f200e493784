//! Responses generated by the proxy itself.
//!
//! # Responsibilities
//! - Rejection responses for the OpenAPI filter (404, 405)
//! - Gateway error responses when the upstream cannot be reached
//!
//! # Design Decisions
//! - Plain-text bodies, no content negotiation
//! - Upstream responses are never rewritten here, only relayed

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// 404 for API paths absent from the specification.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
}

/// 405 for methods not declared on a matched path.
///
/// `allow` is the value for the `Allow` header; `None` leaves it out.
pub fn method_not_allowed(allow: Option<HeaderValue>) -> Response {
    let mut response = Response::new(Body::from("Not allowed\n"));
    *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
    if let Some(allow) = allow {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}

/// 502 when the upstream request could not be completed.
pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_allowed_allow_header() {
        let response = method_not_allowed(Some(HeaderValue::from_static("GET, DELETE")));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, DELETE");

        let response = method_not_allowed(None);
        assert!(response.headers().get(header::ALLOW).is_none());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(bad_gateway().status(), StatusCode::BAD_GATEWAY);
    }
}
