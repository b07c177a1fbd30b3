//! Chat Relay - a streaming proxy for chat-completion APIs
//!
//! This library provides a small HTTP service that lets a browser client talk
//! to a third-party chat-completion API without holding the API secret:
//!
//! - **CORS**: every response carries permissive (or configured) CORS headers
//! - **Credential injection**: the upstream bearer token lives server-side
//! - **Streaming relay**: upstream Server-Sent Events are forwarded
//!   byte-for-byte, chunk by chunk, in arrival order
//!
//! # Architecture
//!
//! - [`core`]: configuration, errors, logging context, middleware
//! - [`api`]: the relay handler, models, upstream client and stream relay
//!
//! # Configuration
//!
//! - `GROQ_API_KEY`: upstream bearer token (not validated at startup)
//!
//! Optional environment variables:
//! - `CONFIG_PATH`: YAML configuration file
//! - `HOST`: Server bind address (default: 0.0.0.0)
//! - `PORT`: Server port (default: 3000)
//! - `UPSTREAM_URL`: chat-completion endpoint (default: Groq)
//! - `UPSTREAM_MODEL`: model identifier (default: llama3-70b-8192)
//! - `CORS_ALLOW_ORIGIN`: `Access-Control-Allow-Origin` value (default: *)
//! - `VERIFY_SSL`: Verify SSL certificates for upstream (default: true)
//! - `CONNECT_TIMEOUT_SECS`: upstream connect timeout (default: 10)

pub mod api;
pub mod core;

// Re-export commonly used types for convenience
pub use api::{build_router, relay_chat, AppState};
pub use self::core::{AppConfig, AppError, Result};
