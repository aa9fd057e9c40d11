//! Temporary link inspection and purge commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use filestash_core::config::{purge_cutoff, retention_window};
use filestash_core::error::AppError;
use filestash_entity::link::{LinkId, TemporaryLink};
use filestash_service::ClaimOnceLinkStore;

/// Arguments for link commands
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Link subcommand
    #[command(subcommand)]
    pub command: LinkCommand,
}

/// Link subcommands
#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// Show a link's target and state without consuming it
    Inspect {
        /// Link token
        token: String,
    },
    /// Delete consumed and expired links older than a cutoff
    Purge {
        /// Age cutoff in days; defaults to `links.retention_days`
        #[arg(long)]
        older_than_days: Option<u32>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Link display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LinkRow {
    /// Redacted token
    token: String,
    /// Target kind
    kind: String,
    /// Target ID
    target_id: String,
    /// Current state
    state: String,
    /// Issuing user
    issued_by: String,
    /// Created at
    created_at: String,
    /// Consumed at
    consumed_at: String,
    /// Expires at
    expires_at: String,
}

impl LinkRow {
    fn new(link: &TemporaryLink) -> Self {
        let stamp = |t: Option<chrono::DateTime<Utc>>| {
            t.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        Self {
            token: link.id.redacted(),
            kind: link.target.kind().to_string(),
            target_id: link.target.resource_id().to_string(),
            state: link.state_at(Utc::now()).to_string(),
            issued_by: link
                .issued_by
                .map(|u| u.to_string())
                .unwrap_or_else(|| "-".to_string()),
            created_at: stamp(Some(link.created_at)),
            consumed_at: stamp(link.consumed_at),
            expires_at: stamp(link.expires_at),
        }
    }
}

/// Cutoff for purging links older than `days` days.
fn cutoff_for(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, AppError> {
    purge_cutoff(now, retention_window(days)?)
}

/// Execute link commands
pub async fn execute(
    args: &LinkArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let backends = super::open_backends(&config).await?;
    let links = ClaimOnceLinkStore::new(backends.links, config.links.ttl());

    match &args.command {
        LinkCommand::Inspect { token } => {
            let link = links.peek(&LinkId::new(token.trim())).await?;
            output::print_item(&LinkRow::new(&link), format);
        }
        LinkCommand::Purge {
            older_than_days,
            yes,
        } => {
            let days = older_than_days.unwrap_or(config.links.retention_days);
            if days == 0 && older_than_days.is_none() {
                output::print_warning(
                    "links.retention_days is 0; pass --older-than-days to purge anyway",
                );
                return Ok(());
            }
            let cutoff = cutoff_for(Utc::now(), days)?;

            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete consumed and expired links older than {days} days?"
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = links.purge(cutoff).await?;
            output::print_kv("Cutoff", &cutoff.to_rfc3339());
            output::print_success(&format!("Purged {removed} link(s)"));
        }
    }

    Ok(())
}
