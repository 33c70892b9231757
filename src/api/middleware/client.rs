//! Client identification: device id, address and user agent

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use tracing::debug;

use crate::domain::ClientInfo;

pub const DEVICE_ID_HEADER: &str = "x-device-id";

const MAX_DEVICE_ID_LEN: usize = 128;

/// Ensure every request carries a device id
///
/// A fresh id is generated when the client sent none and echoed back in the
/// response so the client can keep it.
pub async fn device_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    if device_id_from(request.headers()).is_some() {
        return next.run(request).await;
    }

    let device_id = uuid::Uuid::new_v4().to_string();
    let Ok(value) = HeaderValue::from_str(&device_id) else {
        return next.run(request).await;
    };

    debug!(device_id = %device_id, "Assigned new device id");
    request.headers_mut().insert(DEVICE_ID_HEADER, value.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(DEVICE_ID_HEADER, value);
    response
}

fn device_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(DEVICE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.chars().take(MAX_DEVICE_ID_LEN).collect())
}

/// First address of `X-Forwarded-For`, else `X-Real-IP`
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        })
        .map(str::to_string)
}

/// Build the client description from request headers
pub fn client_info(headers: &HeaderMap) -> ClientInfo {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let device_id = device_id_from(headers).unwrap_or_else(|| "unknown".to_string());

    ClientInfo::new(client_ip(headers).as_deref(), user_agent, device_id)
}

/// Extractor for the calling client
#[derive(Debug, Clone)]
pub struct Client(pub ClientInfo);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Client(client_info(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn test_forwarded_for_takes_first_address() {
        let info = client_info(&headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
            ("x-device-id", "dev-1"),
        ]));
        assert_eq!(info.ip, "203.0.113.7");
        assert_eq!(info.device_id, "dev-1");
    }

    #[test]
    fn test_real_ip_fallback() {
        let info = client_info(&headers(&[("x-real-ip", "10.0.0.2")]));
        assert_eq!(info.ip, "10.0.0.2");
    }

    #[test]
    fn test_missing_headers_are_unknown() {
        let info = client_info(&HeaderMap::new());
        assert_eq!(info.ip, "unknown");
        assert_eq!(info.user_agent, "unknown");
        assert_eq!(info.device_id, "unknown");
    }

    #[test]
    fn test_blank_device_id_is_ignored() {
        assert_eq!(device_id_from(&headers(&[("x-device-id", "  ")])), None);
    }
}
