//! FileStash server: file storage with single-use download links.
//!
//! Loads configuration, initialises logging, and hands over to the API
//! crate's server runner.

use tracing_subscriber::{EnvFilter, fmt};

use filestash_core::config::AppConfig;
use filestash_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting FileStash v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = filestash_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `FILESTASH_CONFIG`, or from `config/default`
/// plus the `config/$FILESTASH_ENV` overlay.
fn load_configuration() -> Result<AppConfig, AppError> {
    if let Ok(path) = std::env::var("FILESTASH_CONFIG") {
        return AppConfig::load_file(path);
    }
    let env = std::env::var("FILESTASH_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
