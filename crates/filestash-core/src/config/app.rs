//! HTTP server and CORS configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally visible base URL used when building temporary link URLs,
    /// e.g. `https://files.example.com`. When unset the URL is derived from
    /// the request's `Host` and `X-Forwarded-Proto` headers.
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Maximum size of a single uploaded file in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Maximum size of a whole request body in bytes. Bounds multi-file
    /// uploads; must be at least `max_upload_size_bytes`.
    #[serde(default = "default_max_request_body")]
    pub max_request_body_bytes: u64,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            max_upload_size_bytes: default_max_upload(),
            max_request_body_bytes: default_max_request_body(),
            request_timeout_seconds: default_request_timeout(),
            shutdown_grace_seconds: default_shutdown_grace(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins (use `["*"]` for development only).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Max age for preflight cache in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            max_age_seconds: default_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_max_request_body() -> u64 {
    1_073_741_824 // 1 GB
}

fn default_request_timeout() -> u64 {
    60
}

fn default_shutdown_grace() -> u64 {
    30
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_age() -> u64 {
    3600
}
