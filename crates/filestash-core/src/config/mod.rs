//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay, and `FILESTASH__*`
//! environment variables. Each sub-module represents one section.

pub mod app;
pub mod database;
pub mod links;
pub mod logging;
pub mod storage;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::links::{LinksConfig, purge_cutoff, retention_window};
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable prefix; `FILESTASH__SERVER__PORT=9000` sets `server.port`.
const ENV_PREFIX: &str = "FILESTASH";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence backend settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Temporary link settings.
    #[serde(default)]
    pub links: LinksConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default`, the `config/{env}` overlay, and environment
    /// variables, in that order of precedence.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Load configuration from an explicit file, still honouring environment
    /// variable overrides.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(env_source())
            .build()
            .map_err(|e| {
                AppError::configuration(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            })?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self, AppError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject combinations that would only fail later at startup.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.backend = \"postgres\"",
            ));
        }
        if self.server.max_upload_size_bytes == 0 {
            return Err(AppError::configuration(
                "server.max_upload_size_bytes must be greater than zero",
            ));
        }
        if self.server.max_request_body_bytes < self.server.max_upload_size_bytes {
            return Err(AppError::configuration(
                "server.max_request_body_bytes must be at least server.max_upload_size_bytes",
            ));
        }
        self.links.validate()
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_memory_backed_and_valid() {
        let config = AppConfig::default();
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.links.ttl_seconds, None);
        assert_eq!(config.links.retention_days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_url() {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Postgres;
        let err = config.validate().expect_err("url missing");
        assert_eq!(err.kind, crate::ErrorKind::Configuration);

        config.database.url = "postgres://localhost/filestash".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = AppConfig::default();
        config.links.ttl_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_link_settings_rejected() {
        let mut config = AppConfig::default();
        config.links.ttl_seconds = Some(20_000_000_000_000);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.links.retention_days = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_body_limit_below_file_limit_rejected() {
        let mut config = AppConfig::default();
        config.server.max_request_body_bytes = config.server.max_upload_size_bytes - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 9100
                public_base_url = "https://files.example.com"

                [links]
                ttl_seconds = 600
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .expect("build");
        let parsed = AppConfig::finish(config).expect("valid config");

        assert_eq!(parsed.server.port, 9100);
        assert_eq!(
            parsed.server.public_base_url.as_deref(),
            Some("https://files.example.com")
        );
        assert_eq!(parsed.links.ttl(), Some(chrono::Duration::seconds(600)));
        assert_eq!(parsed.storage.uploads_dir, "uploads");
    }
}
