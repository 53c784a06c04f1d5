use crate::changelog;
use crate::config::Config;
use crate::db::connection;
use crate::prompts;
use anyhow::Result;
use tracing::info;

/// Create the changelog table. Safe to run when it already exists.
pub async fn cmd_init(config: &Config) -> Result<()> {
    info!("Initializing changelog table");

    let password = prompts::resolve_password(config)?;
    let pool = connection::connect(config, password.as_deref()).await?;

    let result = changelog::ensure_changelog_exists(&pool, &config.migrations.changelog_table).await;
    pool.close().await;
    result?;

    println!(
        "Changelog table \"{}\" is ready.",
        config.migrations.changelog_table
    );
    Ok(())
}
