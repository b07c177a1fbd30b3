//! API layer for the chat relay.
//!
//! This module contains the relay handler, request/response models,
//! upstream request execution and streaming support.

pub mod handlers;
pub mod models;
pub mod streaming;
pub mod upstream;

// Re-export commonly used types
pub use handlers::{build_router, relay_chat, AppState};
pub use models::{ErrorBody, RelayRequest, UpstreamChatRequest};
pub use streaming::{relay_response, RelayStream};
pub use upstream::{build_upstream_request, send_chat_request};
