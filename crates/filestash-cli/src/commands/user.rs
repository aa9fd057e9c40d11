//! User management CLI commands.

use std::str::FromStr;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use filestash_core::error::AppError;
use filestash_core::types::UserId;
use filestash_entity::user::User;
use filestash_service::UserService;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a new user and print its id
    Create,
    /// Show an active user
    Show {
        /// User ID
        id: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Created at
    created_at: String,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            created_at: user.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let backends = super::open_backends(&config).await?;
    let users = UserService::new(backends.users);

    match &args.command {
        UserCommand::Create => {
            let user = users.create_user().await?;
            output::print_item(&UserRow::from(user), format);
        }
        UserCommand::Show { id } => {
            let id = UserId::from_str(id)
                .map_err(|_| AppError::validation(format!("'{id}' is not a user id")))?;
            let user = users.get_user(id).await?;
            output::print_item(&UserRow::from(user), format);
        }
    }

    Ok(())
}
