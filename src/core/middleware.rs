//! HTTP middleware for CORS headers and request tracking.

use crate::core::config::CorsConfig;
use crate::core::logging::{generate_request_id, REQUEST_ID};
use crate::core::{AppError, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Value of `Access-Control-Allow-Methods`.
pub const CORS_ALLOW_METHODS: &str = "POST, OPTIONS";

/// Value of `Access-Control-Allow-Headers`.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Header carrying the per-request ID back to the caller.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Pre-validated CORS header values, set on every response.
#[derive(Clone, Debug)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
}

impl CorsHeaders {
    /// Build from configuration, rejecting origins that are not valid header values.
    pub fn from_config(config: &CorsConfig) -> Result<Self> {
        let allow_origin = HeaderValue::from_str(&config.allow_origin).map_err(|e| {
            AppError::Config(anyhow::anyhow!(
                "Invalid CORS allow_origin '{}': {}",
                config.allow_origin,
                e
            ))
        })?;
        Ok(Self { allow_origin })
    }

    /// Insert the three CORS headers, replacing any existing values.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        );
    }
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
        }
    }
}

/// Set CORS headers on every response path, including errors and preflight.
pub async fn cors_headers_middleware(
    State(cors): State<CorsHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    cors.apply(response.headers_mut());
    response
}

/// Assign a request ID, scope it for the handler, and log the outcome.
///
/// The logged duration covers the time to response headers; streamed bodies
/// log their own completion.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = generate_request_id();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let mut response = REQUEST_ID
        .scope(request_id.clone(), next.run(request))
        .await;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
