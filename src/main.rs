//! Chat Relay - Main entry point
//!
//! This binary loads configuration, builds the shared HTTP client and serves
//! the relay router until Ctrl-C.

use anyhow::Result;
use chat_relay::{
    api::{build_router, AppState},
    core::{logging::build_env_filter, logging::LocalTime, AppConfig},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    init_tracing();

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::load(&path)?
        }
        Err(_) => AppConfig::from_env()?,
    };

    if config.upstream.api_key.is_none() {
        tracing::warn!("No upstream API key configured; upstream calls will fail authentication");
    }

    let http_client = create_http_client(&config)?;

    tracing::info!(
        upstream = %config.upstream.url,
        model = %config.upstream.model,
        allow_origin = %config.cors.allow_origin,
        "Relay configured"
    );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, http_client));
    let app = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Starting chat relay on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Chat relay stopped");
    Ok(())
}

/// Initialize logging with local timezone timestamps.
///
/// `NO_COLOR` disables ANSI colors (for file logging).
fn init_tracing() {
    let no_color = std::env::var("NO_COLOR").is_ok();
    let filter = build_env_filter(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTime)
                .with_ansi(!no_color),
        )
        .init();
}

/// Create the pooled HTTP client used for every upstream call.
///
/// Only a connect timeout is set so long-running streams are never cut off.
fn create_http_client(config: &AppConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(!config.verify_ssl)
        .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(100)
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .build()?;
    Ok(client)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
