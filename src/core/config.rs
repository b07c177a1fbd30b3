//! Configuration management for the chat relay.
//!
//! Configuration comes from built-in defaults, an optional YAML file with
//! environment variable expansion, and environment variable overrides
//! (applied last, so they always win).

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;

/// Default upstream chat-completion endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model identifier sent upstream.
pub const DEFAULT_UPSTREAM_MODEL: &str = "llama3-70b-8192";

/// Environment variable holding the upstream bearer token.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream chat-completion API
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// CORS response headers
    #[serde(default)]
    pub cors: CorsConfig,

    /// Whether to verify SSL certificates for upstream requests
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Connect timeout in seconds for upstream requests.
    ///
    /// No total timeout is applied to upstream requests.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            cors: CorsConfig::default(),
            verify_ssl: default_verify_ssl(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Server-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Full chat-completion URL
    #[serde(default = "default_upstream_url")]
    pub url: String,

    /// Model identifier injected into every upstream request
    #[serde(default = "default_upstream_model")]
    pub model: String,

    /// Bearer token. Not validated; a missing key surfaces as an upstream auth error.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            model: default_upstream_model(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// CORS header configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Origin`
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: default_allow_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_upstream_model() -> String {
    DEFAULT_UPSTREAM_MODEL.to_string()
}

fn default_allow_origin() -> String {
    "*".to_string()
}

fn default_verify_ssl() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    10
}

impl AppConfig {
    /// Build configuration from defaults and environment variables only.
    pub fn from_env() -> Result<Self> {
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// `${VAR}`, `${VAR:-default}` and `${VAR:default}` are expanded before
    /// parsing, then environment overrides are applied.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chat_relay::core::config::AppConfig;
    ///
    /// let config = AppConfig::load("relay.yaml").expect("Failed to load config");
    /// ```
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let expanded = expand_env_vars(&content);

        let mut config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from_str(&expanded, ::config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT: {}", port))?;
        }

        if let Ok(url) = std::env::var("UPSTREAM_URL") {
            self.upstream.url = url;
        }

        if let Ok(model) = std::env::var("UPSTREAM_MODEL") {
            self.upstream.model = model;
        }

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.upstream.api_key = Some(key);
        }

        if let Ok(origin) = std::env::var("CORS_ALLOW_ORIGIN") {
            self.cors.allow_origin = origin;
        }

        if let Ok(verify_ssl) = std::env::var("VERIFY_SSL") {
            self.verify_ssl = str_to_bool(&verify_ssl);
        }

        if let Ok(timeout) = std::env::var("CONNECT_TIMEOUT_SECS") {
            self.connect_timeout_secs = timeout
                .parse()
                .with_context(|| format!("Invalid CONNECT_TIMEOUT_SECS: {}", timeout))?;
        }

        Ok(())
    }
}

/// Expand environment variables in configuration content.
///
/// Supports patterns: ${VAR}, ${VAR:-default}, ${VAR:default}
fn expand_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}:]+)(?::-?([^}]*))?\}").expect("valid env var pattern");

    re.replace_all(content, |caps: &regex::Captures| {
        let default_value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(&caps[1]).unwrap_or_else(|_| default_value.to_string())
    })
    .to_string()
}

/// Convert string to boolean.
///
/// Accepts: "true", "1", "yes", "on" (case-insensitive)
fn str_to_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
