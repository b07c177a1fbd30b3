//! HTTP request handler for the chat relay.
//!
//! A single handler serves every path. It answers CORS preflight, rejects
//! methods other than POST, and relays POSTed conversations to the upstream
//! chat-completion API.

use crate::api::models::RelayRequest;
use crate::api::streaming::relay_response;
use crate::api::upstream::send_chat_request;
use crate::core::logging::get_request_id;
use crate::core::middleware::{cors_headers_middleware, request_id_middleware, CorsHeaders};
use crate::core::{AppConfig, AppError, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Read-only after construction; requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

/// Handle one relay request.
///
/// - `OPTIONS`: 200 with an empty body.
/// - `POST`: forward `messages` upstream and stream the answer back.
/// - anything else: 405.
#[tracing::instrument(skip_all, fields(method = %method))]
pub async fn relay_chat(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    match method {
        Method::OPTIONS => return Ok(StatusCode::OK.into_response()),
        Method::POST => {}
        _ => return Err(AppError::MethodNotAllowed),
    }

    let body = body.map_err(|rejection| {
        AppError::Internal(format!("failed to read request body: {}", rejection.body_text()))
    })?;
    let request = RelayRequest::from_body(&body)?;
    let request_id = get_request_id();

    tracing::debug!(
        request_id = %request_id,
        model = %state.config.upstream.model,
        "Forwarding chat request upstream"
    );

    let upstream =
        send_chat_request(&state.http_client, &state.config.upstream, &request.messages).await?;

    Ok(relay_response(upstream, request_id))
}

/// Build the router: the relay handler on every path, wrapped in request-ID
/// tracking, CORS headers and HTTP tracing.
pub fn build_router(state: Arc<AppState>) -> Result<Router> {
    let cors = CorsHeaders::from_config(&state.config.cors)?;

    Ok(Router::new()
        .fallback(relay_chat)
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            cors,
            cors_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http()))
}
