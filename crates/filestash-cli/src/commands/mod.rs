//! CLI command definitions and dispatch.

pub mod config;
pub mod link;
pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use filestash_api::Backends;
use filestash_core::config::{AppConfig, DatabaseBackend};
use filestash_core::error::AppError;

/// FileStash: file storage with single-use download links
#[derive(Debug, Parser)]
#[command(name = "filestash", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file. Without it, `config/default` and the
    /// `config/$FILESTASH_ENV` overlay are used.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the FileStash server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Temporary link inspection and housekeeping
    Link(link::LinkArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config_path = self.config.as_deref();
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config_path).await,
            Commands::Migrate(args) => migrate::execute(args, config_path).await,
            Commands::User(args) => user::execute(args, config_path, self.format).await,
            Commands::Link(args) => link::execute(args, config_path, self.format).await,
            Commands::Config(args) => config::execute(args, config_path, self.format),
        }
    }
}

/// Helper: load configuration from `path`, or from the environment overlay
pub fn load_config(path: Option<&str>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("FILESTASH_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Helper: open the persistent backend. The in-memory backend only lives
/// inside a server process, so offline commands refuse it.
pub async fn open_backends(config: &AppConfig) -> Result<Backends, AppError> {
    if config.database.backend == DatabaseBackend::Memory {
        return Err(AppError::configuration(
            "This command needs database.backend = \"postgres\"; the in-memory backend has no state outside the server",
        ));
    }
    Backends::from_config(config).await
}
