//! Error types and handling for the chat relay.
//!
//! This module provides a unified error type [`AppError`] that wraps various error sources
//! and implements HTTP response conversion. Every error renders as a flat
//! `{"error": "<message>"}` JSON body.

use crate::api::models::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Message returned to callers for every internal failure.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Method other than POST or OPTIONS
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// POST body without a `messages` field
    #[error("Missing messages in request body")]
    MissingMessages,

    /// Upstream answered with a non-success status; `message` is its raw body text
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// HTTP request errors from the reqwest client
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Generic internal server errors with custom message
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingMessages => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Request(_)
            | AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            AppError::MethodNotAllowed | AppError::MissingMessages => self.to_string(),
            AppError::Upstream { status, message } => {
                tracing::warn!(status, error = %message, "Upstream returned error status");
                message
            }
            AppError::Request(ref e) => {
                tracing::error!(
                    error = %e,
                    is_timeout = e.is_timeout(),
                    is_connect = e.is_connect(),
                    "Backend error"
                );
                INTERNAL_SERVER_ERROR_MESSAGE.to_string()
            }
            AppError::Serialization(_) | AppError::Config(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Backend error");
                INTERNAL_SERVER_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
