//! Logging utilities with request context support.
//!
//! A request ID is stored in task-local storage for the lifetime of one
//! request so that handler and stream logs can be correlated without passing
//! the ID through every function call.

use chrono::Local;

tokio::task_local! {
    /// Task-local storage for the current request ID.
    pub static REQUEST_ID: String;
}

/// Get the current request ID from context, if set.
///
/// Returns an empty string if no request ID is set.
pub fn get_request_id() -> String {
    REQUEST_ID.try_with(|id| id.clone()).unwrap_or_default()
}

/// Generate a new unique request ID using UUID v4.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Timestamp formatter that uses the local timezone (respects TZ).
pub struct LocalTime;

impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Build the env filter used by the binary.
///
/// `base` defaults to `info,chat_relay=debug`. Noisy HTTP library logs are
/// always clamped to `warn`, even when `RUST_LOG` is set to `trace`.
pub fn build_env_filter(base: Option<&str>) -> tracing_subscriber::EnvFilter {
    let base = base.unwrap_or("info,chat_relay=debug");
    tracing_subscriber::EnvFilter::new(format!(
        "{},hyper=warn,hyper::proto=warn,h2=warn,reqwest=warn",
        base
    ))
}
