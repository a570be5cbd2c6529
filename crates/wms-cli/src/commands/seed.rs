//! Default account seeding.

use clap::Args;

use wms_core::config::AppConfig;
use wms_core::error::ErrorKind;
use wms_entity::user::UserRole;
use wms_service::user::CreateUserInput;

use crate::output;

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Password for admin@example.com
    #[arg(long, env = "WMS_SEED_ADMIN_PASSWORD")]
    pub admin_password: String,
    /// Password for manager@example.com
    #[arg(long, env = "WMS_SEED_MANAGER_PASSWORD")]
    pub manager_password: String,
}

/// Create the default admin and manager when they do not exist yet
pub async fn execute(args: &SeedArgs, config: AppConfig) -> anyhow::Result<()> {
    let state = super::build_state(config).await?;

    let accounts = [
        ("admin@example.com", "System Administrator", UserRole::Admin, &args.admin_password),
        ("manager@example.com", "Service Manager", UserRole::Manager, &args.manager_password),
    ];

    for (email, full_name, role, password) in accounts {
        let result = state
            .admin_user_service
            .provision(CreateUserInput {
                email: email.to_string(),
                password: password.clone(),
                full_name: full_name.to_string(),
                role: Some(role),
                is_active: Some(true),
            })
            .await;

        match result {
            Ok(user) => output::print_success(&format!("Created {} ({})", user.email, user.role)),
            Err(e) if e.kind == ErrorKind::Conflict => {
                output::print_warning(&format!("{email} already exists, skipped"));
            }
            Err(e) => return Err(anyhow::Error::new(e).context(format!("Failed to seed {email}"))),
        }
    }

    Ok(())
}
