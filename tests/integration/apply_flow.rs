// End-to-end tests for applying discovered migrations against a database

use crate::helpers::harness::{skip_without_database, with_test_db};
use anyhow::Result;
use pgup::changelog::{ensure_changelog_exists, last_applied_version};
use pgup::error::MigrateError;
use pgup::migration::{MigrationApplier, discover_migrations, pending_migrations};
use pgup::progress::ApplyReporter;
use sqlx::Row;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TABLE: &str = "changelog";

fn write_migrations(dir: &Path, files: &[(&str, &str)]) {
    for (name, sql) in files {
        fs::write(dir.join(name), sql).expect("Failed to write migration file");
    }
}

async fn changelog_state(pool: &sqlx::PgPool, version: i64) -> Option<bool> {
    sqlx::query("SELECT state FROM \"changelog\" WHERE version = $1")
        .bind(version)
        .fetch_optional(pool)
        .await
        .expect("Failed to query changelog")
        .map(|row| row.get::<bool, _>("state"))
}

#[tokio::test]
async fn test_apply_runs_pending_in_version_order() -> Result<()> {
    if skip_without_database() {
        return Ok(());
    }
    with_test_db(async |db| {
        let dir = TempDir::new()?;
        write_migrations(
            dir.path(),
            &[
                ("2_add_fruit.sql", "INSERT INTO fruits (name) VALUES ('apple'), ('pear');"),
                ("1_create_fruits.sql", "CREATE TABLE fruits (id SERIAL, name TEXT);"),
            ],
        );

        ensure_changelog_exists(db.pool(), TABLE).await?;
        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        assert_eq!(pending.len(), 2);

        let reporter = ApplyReporter::new(pending.len());
        let mut applier = MigrationApplier::new(db.pool().clone(), TABLE.to_string(), reporter);
        let applied = applier.apply_all(&pending).await?;
        assert_eq!(applied, 2);

        // The insert only works if version 1 ran first
        let fruit_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fruits")
            .fetch_one(db.pool())
            .await?;
        assert_eq!(fruit_count, 2);

        assert_eq!(changelog_state(db.pool(), 1).await, Some(true));
        assert_eq!(changelog_state(db.pool(), 2).await, Some(true));
        assert_eq!(last_applied_version(db.pool(), TABLE).await?, 2);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_second_run_finds_nothing_pending() -> Result<()> {
    if skip_without_database() {
        return Ok(());
    }
    with_test_db(async |db| {
        let dir = TempDir::new()?;
        write_migrations(
            dir.path(),
            &[("1_create_fruits.sql", "CREATE TABLE fruits (id SERIAL);")],
        );

        ensure_changelog_exists(db.pool(), TABLE).await?;
        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        let reporter = ApplyReporter::new(pending.len());
        let mut applier = MigrationApplier::new(db.pool().clone(), TABLE.to_string(), reporter);
        applier.apply_all(&pending).await?;

        // Same directory, same database: everything is already recorded
        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        assert!(pending.is_empty());
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_failure_stops_run_and_rolls_back_the_failed_file() -> Result<()> {
    if skip_without_database() {
        return Ok(());
    }
    with_test_db(async |db| {
        let dir = TempDir::new()?;
        write_migrations(
            dir.path(),
            &[
                ("1_create_plants.sql", "CREATE TABLE plants (id SERIAL);"),
                (
                    "2_create_gardens.sql",
                    "CREATE TABLE gardens (id SERIAL);\nINSERT INTO no_such_table VALUES (1);",
                ),
                ("3_create_flowers.sql", "CREATE TABLE flowers (id SERIAL);"),
            ],
        );

        ensure_changelog_exists(db.pool(), TABLE).await?;
        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        let reporter = ApplyReporter::new(pending.len());
        let mut applier = MigrationApplier::new(db.pool().clone(), TABLE.to_string(), reporter);

        let error = applier.apply_all(&pending).await.unwrap_err();
        assert!(matches!(error, MigrateError::Execution { version: 2, .. }));
        assert!(error.to_string().contains("2_create_gardens.sql"));

        // Version 1 committed before the failure and stays applied
        assert_eq!(changelog_state(db.pool(), 1).await, Some(true));
        assert_eq!(last_applied_version(db.pool(), TABLE).await?, 1);

        // Version 2 rolled back completely, leaving only the attempt row
        assert_eq!(changelog_state(db.pool(), 2).await, Some(false));
        let gardens: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'gardens'",
        )
        .fetch_one(db.pool())
        .await?;
        assert_eq!(gardens, 0);

        // Version 3 was never attempted
        assert_eq!(changelog_state(db.pool(), 3).await, None);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_fixed_migration_reruns_without_touching_applied_ones() -> Result<()> {
    if skip_without_database() {
        return Ok(());
    }
    with_test_db(async |db| {
        let dir = TempDir::new()?;
        write_migrations(
            dir.path(),
            &[
                ("1_create_plants.sql", "CREATE TABLE plants (id SERIAL);"),
                ("2_create_gardens.sql", "INSERT INTO no_such_table VALUES (1);"),
            ],
        );

        ensure_changelog_exists(db.pool(), TABLE).await?;
        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        let reporter = ApplyReporter::new(pending.len());
        let mut applier = MigrationApplier::new(db.pool().clone(), TABLE.to_string(), reporter);
        assert!(applier.apply_all(&pending).await.is_err());

        write_migrations(
            dir.path(),
            &[("2_create_gardens.sql", "CREATE TABLE gardens (id SERIAL);")],
        );

        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        let versions: Vec<u64> = pending.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![2]);

        let reporter = ApplyReporter::new(pending.len());
        let mut applier = MigrationApplier::new(db.pool().clone(), TABLE.to_string(), reporter);
        assert_eq!(applier.apply_all(&pending).await?, 1);

        assert_eq!(changelog_state(db.pool(), 2).await, Some(true));
        assert_eq!(last_applied_version(db.pool(), TABLE).await?, 2);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_late_file_below_newest_applied_version_is_still_pending() -> Result<()> {
    if skip_without_database() {
        return Ok(());
    }
    with_test_db(async |db| {
        let dir = TempDir::new()?;
        write_migrations(
            dir.path(),
            &[("2_create_fruits.sql", "CREATE TABLE fruits (id SERIAL);")],
        );

        ensure_changelog_exists(db.pool(), TABLE).await?;
        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        let reporter = ApplyReporter::new(pending.len());
        let mut applier = MigrationApplier::new(db.pool().clone(), TABLE.to_string(), reporter);
        applier.apply_all(&pending).await?;

        // A migration merged late with a lower version must not be skipped
        write_migrations(
            dir.path(),
            &[("1_create_plants.sql", "CREATE TABLE plants (id SERIAL);")],
        );

        let catalog = discover_migrations(dir.path())?;
        let pending = pending_migrations(db.pool(), TABLE, &catalog).await?;
        let versions: Vec<u64> = pending.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1]);

        let reporter = ApplyReporter::new(pending.len());
        let mut applier = MigrationApplier::new(db.pool().clone(), TABLE.to_string(), reporter);
        assert_eq!(applier.apply_all(&pending).await?, 1);
        assert!(pgup::changelog::is_applied(db.pool(), TABLE, 1).await?);
        Ok(())
    })
    .await
}
