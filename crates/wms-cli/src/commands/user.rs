//! Staff account CLI commands.

use anyhow::Context;
use clap::{Args, Subcommand};
use dialoguer::{Input, Password};
use serde::Serialize;
use tabled::Tabled;

use wms_core::config::AppConfig;
use wms_entity::user::{User, UserRole};
use wms_service::user::CreateUserInput;

use crate::output::{self, OutputFormat};

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
    /// Create a staff account
    Create {
        /// Login email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
        /// Full name (prompted when omitted)
        #[arg(long)]
        name: Option<String>,
        /// Role: admin, manager or technician
        #[arg(long, default_value = "technician")]
        role: UserRole,
        /// Initial password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// List all staff accounts
    List,
    /// Activate or deactivate an account
    SetActive {
        /// Account email
        email: String,
        /// New active flag
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Set a new password for an account
    ResetPassword {
        /// Account email
        email: String,
        /// New password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    full_name: String,
    role: String,
    active: bool,
    last_login: String,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            full_name: u.full_name.clone(),
            role: u.role.to_string(),
            active: u.is_active,
            last_login: u
                .last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: AppConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let state = super::build_state(config).await?;
    let users = &state.admin_user_service;

    match &args.command {
        UserCommand::Create {
            email,
            name,
            role,
            password,
        } => {
            let email = match email {
                Some(email) => email.clone(),
                None => Input::<String>::new()
                    .with_prompt("Email")
                    .interact_text()
                    .context("Input error")?,
            };
            let full_name = match name {
                Some(name) => name.clone(),
                None => Input::<String>::new()
                    .with_prompt("Full name")
                    .interact_text()
                    .context("Input error")?,
            };
            let password = match password {
                Some(password) => password.clone(),
                None => prompt_password()?,
            };

            let user = users
                .provision(CreateUserInput {
                    email,
                    password,
                    full_name,
                    role: Some(*role),
                    is_active: Some(true),
                })
                .await
                .context("Failed to create user")?;

            output::print_success(&format!("User '{}' created ({})", user.email, user.role));
            output::print_kv("ID", &user.id.to_string());
        }
        UserCommand::List => {
            let all = users.all_users().await.context("Failed to list users")?;
            let rows: Vec<UserRow> = all.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::SetActive { email, active } => {
            let user = users
                .set_active(email, *active)
                .await
                .context("Failed to update user")?;
            let label = if user.is_active { "activated" } else { "deactivated" };
            output::print_success(&format!("User '{}' {label}", user.email));
        }
        UserCommand::ResetPassword { email, password } => {
            let password = match password {
                Some(password) => password.clone(),
                None => prompt_password()?,
            };
            let user = users
                .reset_password_by_email(email, &password)
                .await
                .context("Failed to reset password")?;
            output::print_success(&format!("Password reset for '{}'", user.email));
        }
    }

    Ok(())
}

fn prompt_password() -> anyhow::Result<String> {
    Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .context("Input error")
}
