//! Access key extraction and gating

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use super::client::client_info;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::Page;
use crate::infrastructure::gate::AccessGrant;

/// A page whose content is gated by an access key
pub trait GatedPage: Send + Sync + 'static {
    const PAGE: Page;
}

#[derive(Debug)]
pub struct SignalListPage;

impl GatedPage for SignalListPage {
    const PAGE: Page = Page::SignalList;
}

#[derive(Debug)]
pub struct BacktestPage;

impl GatedPage for BacktestPage {
    const PAGE: Page = Page::Backtest;
}

/// Extractor that runs the access gate for page `P`
///
/// Reads the key from either:
/// - Authorization header: `Bearer <key>`
/// - X-Access-Key header: `<key>`
#[derive(Debug)]
pub struct RequireAccess<P> {
    pub grant: AccessGrant,
    _page: PhantomData<P>,
}

impl<P: GatedPage> FromRequestParts<AppState> for RequireAccess<P> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_key = extract_access_key(&parts.headers)?.unwrap_or_default();
        let client = client_info(&parts.headers);

        let grant = state.gate.authorize(&raw_key, &client, P::PAGE).await?;

        Ok(Self {
            grant,
            _page: PhantomData,
        })
    }
}

/// Access key from request headers, if any
pub fn extract_access_key(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(Some(token.trim().to_string()));
        }
    }

    if let Some(key_header) = headers.get("x-access-key") {
        let key = key_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-Access-Key header encoding"))?;

        return Ok(Some(key.trim().to_string()));
    }

    Ok(None)
}
