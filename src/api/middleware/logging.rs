//! Request/response logging middleware with access key redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{debug, info};

/// Log each request and its outcome
///
/// Span creation is left to `TraceLayer`.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);

    debug!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %redact_headers(&request),
        "Incoming request"
    );

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Loggable headers with access keys replaced
fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| {
            let value = if is_sensitive_header(name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name.as_str(), value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Headers carrying access keys or credentials
fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "x-access-key" | "cookie" | "proxy-authorization"
    )
}

/// Client addresses are left out; they are only ever stored hashed
fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-request-id"
            | "x-device-id"
            | "authorization"
            | "x-access-key"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sensitive_header() {
        assert!(is_sensitive_header("authorization"));
        assert!(is_sensitive_header("x-access-key"));
        assert!(!is_sensitive_header("x-device-id"));
        assert!(!is_sensitive_header("content-type"));
    }

    #[test]
    fn test_client_addresses_not_logged() {
        assert!(!should_log_header("x-forwarded-for"));
        assert!(!should_log_header("x-real-ip"));
        assert!(should_log_header("x-access-key"));
    }

    #[test]
    fn test_redact_headers() {
        let request = Request::builder()
            .uri("/v1/signals")
            .header("x-access-key", "EIGEN-2026-ALPHA")
            .header("x-forwarded-for", "203.0.113.7")
            .header("user-agent", "curl/8.0")
            .body(Body::empty())
            .unwrap();

        let logged = redact_headers(&request);

        assert!(logged.contains("x-access-key=[REDACTED]"));
        assert!(logged.contains("user-agent=curl/8.0"));
        assert!(!logged.contains("EIGEN"));
        assert!(!logged.contains("203.0.113.7"));
    }
}
