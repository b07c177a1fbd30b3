//! Upstream request construction and execution.
//!
//! One POST per relayed request. Transport failures surface as
//! [`AppError::Request`]; non-success statuses are read in full and surface
//! as [`AppError::Upstream`] with the raw body text.

use crate::api::models::UpstreamChatRequest;
use crate::core::config::UpstreamConfig;
use crate::core::{AppError, Result};
use serde_json::Value;
use std::error::Error;

/// Build the upstream chat-completion request for `messages`.
///
/// The bearer token is taken from `config` as-is; a missing key yields an
/// empty token, which the upstream rejects.
pub fn build_upstream_request(
    http_client: &reqwest::Client,
    config: &UpstreamConfig,
    messages: &Value,
) -> reqwest::RequestBuilder {
    let api_key = config.api_key.as_deref().unwrap_or_default();

    http_client
        .post(&config.url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&UpstreamChatRequest::streaming(&config.model, messages))
}

/// Send the chat request and return the upstream response if its status is a success.
pub async fn send_chat_request(
    http_client: &reqwest::Client,
    config: &UpstreamConfig,
    messages: &Value,
) -> Result<reqwest::Response> {
    let response = build_upstream_request(http_client, config, messages)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(
                url = %config.url,
                error = %e,
                error_source = ?e.source(),
                is_timeout = e.is_timeout(),
                is_connect = e.is_connect(),
                "HTTP request failed to upstream"
            );
            AppError::from(e)
        })?;

    let status = response.status();
    tracing::debug!(url = %config.url, status = %status, "Upstream responded");

    if !status.is_success() {
        return Err(read_upstream_error(response).await);
    }

    Ok(response)
}

/// Read a non-success upstream response into an [`AppError::Upstream`].
///
/// The body is kept as raw text and never parsed. A failure while reading it
/// is a transport error.
async fn read_upstream_error(response: reqwest::Response) -> AppError {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(message) => AppError::Upstream { status, message },
        Err(e) => AppError::Request(e),
    }
}
