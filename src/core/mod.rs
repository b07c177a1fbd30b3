//! Core functionality for the chat relay.
//!
//! This module contains the components shared by the handler and the binary:
//! - Configuration management
//! - Error handling
//! - Logging context
//! - HTTP middleware

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;

// Re-export commonly used types
pub use self::config::{AppConfig, CorsConfig, ServerConfig, UpstreamConfig};
pub use error::{AppError, Result};
pub use logging::{generate_request_id, get_request_id, REQUEST_ID};
pub use middleware::{cors_headers_middleware, request_id_middleware, CorsHeaders};
