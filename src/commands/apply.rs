use crate::changelog;
use crate::config::Config;
use crate::db::connection;
use crate::migration::{MigrationApplier, MigrationFile, discover_migrations, pending_migrations};
use crate::progress::{ApplyReporter, format_duration};
use crate::prompts;
use anyhow::Result;
use console::style;
use sqlx::PgPool;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// How an apply run ended. Failures surface as errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    NothingToApply,
    Applied(usize),
}

/// Apply all pending migrations in ascending version order.
pub async fn cmd_apply(config: &Config, create_changelog: bool) -> Result<ApplyOutcome> {
    info!("Applying pending migrations");

    // Scan before touching the database so naming problems surface without
    // a connection.
    let catalog = discover_migrations(Path::new(&config.migrations.dir))?;
    debug!(
        "found {} migration files in '{}'",
        catalog.len(),
        config.migrations.dir
    );

    let password = prompts::resolve_password(config)?;
    let pool = connection::connect(config, password.as_deref()).await?;

    let outcome = run_apply(&pool, config, create_changelog, &catalog).await;
    pool.close().await;
    outcome
}

async fn run_apply(
    pool: &PgPool,
    config: &Config,
    create_changelog: bool,
    catalog: &[MigrationFile],
) -> Result<ApplyOutcome> {
    let table = &config.migrations.changelog_table;

    if create_changelog {
        changelog::ensure_changelog_exists(pool, table).await?;
    }

    let pending = pending_migrations(pool, table, catalog).await?;

    if pending.is_empty() {
        println!("There are no pending migrations to apply.");
        return Ok(ApplyOutcome::NothingToApply);
    }

    let start = Instant::now();
    let reporter = ApplyReporter::new(pending.len());
    let mut applier = MigrationApplier::new(pool.clone(), table.clone(), reporter);
    let applied = applier.apply_all(&pending).await?;

    println!(
        "{} Successfully applied {} migration{} in {}",
        style("✓").green(),
        applied,
        if applied == 1 { "" } else { "s" },
        style(format_duration(start.elapsed())).green()
    );

    Ok(ApplyOutcome::Applied(applied))
}
