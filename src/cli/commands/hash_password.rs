//! Hash password command handler

use anyhow::Context;

use crate::config::Config;
use crate::services::auth_service::hash_password;

pub async fn cmd_hash_password(config: &Config, password: &str) -> anyhow::Result<()> {
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    let security = config.security.clone();
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, Some(&security)))
        .await
        .context("Password hashing task panicked")??;

    println!("{hash}");
    println!();
    println!("Set it as security.admin.password_hash or API_ADMIN_PASSWORD_HASH.");

    Ok(())
}
