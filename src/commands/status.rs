use crate::changelog;
use crate::config::Config;
use crate::db::connection;
use crate::migration::{MigrationFile, discover_migrations, pending_migrations};
use crate::prompts;
use anyhow::Result;
use sqlx::PgPool;
use std::path::Path;
use tracing::info;

/// Show applied changelog entries and migrations still waiting on disk.
pub async fn cmd_status(config: &Config) -> Result<()> {
    info!("Checking migration status");

    let catalog = discover_migrations(Path::new(&config.migrations.dir))?;

    let password = prompts::resolve_password(config)?;
    let pool = connection::connect(config, password.as_deref()).await?;

    let result = print_status(&pool, config, &catalog).await;
    pool.close().await;
    result
}

async fn print_status(pool: &PgPool, config: &Config, catalog: &[MigrationFile]) -> Result<()> {
    let table = &config.migrations.changelog_table;

    let applied = changelog::applied_entries(pool, table).await?;
    let pending = pending_migrations(pool, table, catalog).await?;

    if applied.is_empty() {
        println!("No migrations have been applied.");
    } else {
        let last_applied = changelog::last_applied_version(pool, table).await?;
        println!("Applied migrations (last version: {}):", last_applied);
        for entry in &applied {
            println!(
                "  #{} {} (applied {} by {})",
                entry.version,
                entry.file_name,
                entry.date_time.format("%Y-%m-%d %H:%M:%S"),
                entry.applied_by
            );
        }
    }

    if pending.is_empty() {
        println!("There are no pending migrations to apply.");
    } else {
        println!("Pending migrations:");
        for migration in &pending {
            println!(
                "  #{}, {} (file {})",
                migration.version, migration.title, migration.file_name
            );
        }
    }

    Ok(())
}
