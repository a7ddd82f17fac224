//! Origin allow-list enforcement
//!
//! A request is allowed when it carries no `Origin` header (curl, mobile
//! apps, server-to-server) or when its origin equals or contains one of the
//! allowed entries. Everything else is rejected with 403 before reaching a
//! handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::request;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::error::RelayError;

/// Allow-list of browser origins
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Arc<Vec<String>>,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self {
            allowed: Arc::new(allowed),
        }
    }

    /// Whether a request with the given origin may proceed
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self
                .allowed
                .iter()
                .any(|allowed| origin == allowed || origin.contains(allowed.as_str())),
        }
    }

    fn allows_header(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .map(|origin| self.is_allowed(Some(origin)))
            .unwrap_or(false)
    }
}

/// CORS response headers for allowed origins, credentials included
///
/// Preflights get back whatever request headers the browser asked for.
pub fn cors_layer(policy: OriginPolicy) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &request::Parts| {
                policy.allows_header(origin)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Middleware rejecting requests from origins outside the allow-list
pub async fn enforce_origin(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(header::ORIGIN) {
        Some(origin) if !policy.allows_header(origin) => {
            let origin = String::from_utf8_lossy(origin.as_bytes()).into_owned();
            warn!(%origin, "Origin blocked by CORS");
            RelayError::OriginRejected(origin).into_response()
        }
        _ => next.run(request).await,
    }
}
