//! Seed admin command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_seed_admin(
    config: Config,
    username: Option<String>,
    password: Option<String>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let username = username.unwrap_or_else(|| config.admin.username.clone());
    let password = password.unwrap_or_else(|| config.admin.password.clone());
    let name = name.unwrap_or_else(|| config.admin.name.clone());

    let state = SharedState::new(config).await?;
    let created = state
        .admin_service
        .ensure_admin(&username, &password, &name)
        .await?;

    if created {
        println!("Admin '{username}' created.");
    } else {
        println!("Admin '{username}' already exists, nothing to do.");
    }
    Ok(())
}
