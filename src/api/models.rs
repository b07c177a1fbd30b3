//! API request and response models.
//!
//! The relay keeps `messages` as an opaque JSON value: it is checked for
//! presence only and forwarded upstream untouched.

use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound relay request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    /// Conversation messages, forwarded as-is
    pub messages: Value,
}

impl RelayRequest {
    /// Parse an inbound body.
    ///
    /// Invalid JSON and a literal `null` body are internal errors. Any other
    /// body whose `messages` field is absent or empty-valued (`null`, `false`,
    /// `0`, `""`) is a [`AppError::MissingMessages`]. Empty arrays and objects
    /// count as present.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;

        match value {
            Value::Null => Err(AppError::Internal("request body is null".to_string())),
            Value::Object(mut fields) => match fields.remove("messages") {
                Some(messages) if !is_empty_value(&messages) => Ok(Self { messages }),
                _ => Err(AppError::MissingMessages),
            },
            _ => Err(AppError::MissingMessages),
        }
    }
}

/// Scalars that a client sends in place of a conversation.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Body sent to the upstream chat-completion endpoint.
#[derive(Debug, Serialize)]
pub struct UpstreamChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a Value,
    pub stream: bool,
}

impl<'a> UpstreamChatRequest<'a> {
    /// Streaming request for `model` carrying `messages` unchanged.
    pub fn streaming(model: &'a str, messages: &'a Value) -> Self {
        Self {
            model,
            messages,
            stream: true,
        }
    }
}

/// Error response body: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
