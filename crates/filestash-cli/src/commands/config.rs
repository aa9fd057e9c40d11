//! Configuration inspection commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use filestash_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration and exit
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            OutputFormat::Table => {
                output::print_kv("server", &format!("{}:{}", config.server.host, config.server.port));
                output::print_kv(
                    "public_base_url",
                    config.server.public_base_url.as_deref().unwrap_or("(from request)"),
                );
                output::print_kv("database.backend", &format!("{:?}", config.database.backend));
                output::print_kv("uploads", &config.storage.uploads_root().display().to_string());
                output::print_kv(
                    "links.ttl_seconds",
                    &config
                        .links
                        .ttl_seconds
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                );
                output::print_kv("links.retention_days", &config.links.retention_days.to_string());
                output::print_kv("links.sweep_cron", &config.links.sweep_cron);
                output::print_kv("logging", &format!("{} ({})", config.logging.level, config.logging.format));
            }
        },
        ConfigCommand::Validate => {
            output::print_success("Configuration is valid.");
        }
    }

    Ok(())
}
