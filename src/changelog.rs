//! Changelog table access. One row per migration version; `state` is false
//! while an attempt is in flight and flips to true in the same transaction
//! that ran the file.

use crate::db::identifiers::{quote_identifier, sanitize_identifier};
use crate::error::{MigrateError, MigrateResult};
use crate::migration::MigrationFile;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row};

/// Row describing a successfully applied migration
#[derive(Debug, Clone)]
pub struct ChangelogEntry {
    pub version: u64,
    pub file_name: String,
    pub applied_by: String,
    pub date_time: DateTime<Utc>,
}

/// Convert a migration version for storage in the BIGINT column.
pub fn version_to_db(version: u64) -> MigrateResult<i64> {
    i64::try_from(version).map_err(|_| MigrateError::VersionOutOfRange { version })
}

/// Convert a stored version back. Negative values cannot come from the
/// parser, so they are clamped with a warning rather than propagated.
pub fn version_from_db(version: i64) -> u64 {
    if version < 0 {
        tracing::warn!("negative version {} in changelog, treating as 0", version);
        0
    } else {
        version as u64
    }
}

fn query_error(table: &str, source: sqlx::Error) -> MigrateError {
    MigrateError::ChangelogQuery {
        table: table.to_string(),
        source,
    }
}

/// Create the changelog table if it does not exist. Safe to call repeatedly.
pub async fn ensure_changelog_exists(pool: &PgPool, table: &str) -> MigrateResult<()> {
    let table_ident = quote_identifier(table)?;
    let constraint_base = sanitize_identifier(table)?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_ident} (
            id BIGSERIAL,
            version BIGINT NOT NULL,
            file_name TEXT NOT NULL,
            applied_by TEXT NOT NULL DEFAULT CURRENT_USER,
            date_time TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
            state BOOLEAN NOT NULL DEFAULT FALSE,
            CONSTRAINT {constraint_base}_pkey PRIMARY KEY (id),
            CONSTRAINT {constraint_base}_version_unique UNIQUE (version)
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| MigrateError::CreateChangelog {
        table: table.to_string(),
        source: e,
    })?;

    Ok(())
}

/// Highest version with a successful entry, 0 when none exist.
pub async fn last_applied_version(pool: &PgPool, table: &str) -> MigrateResult<u64> {
    let table_ident = quote_identifier(table)?;

    let last: i64 = sqlx::query_scalar(&format!(
        "SELECT COALESCE(MAX(version), 0) FROM {table_ident} WHERE state = TRUE"
    ))
    .fetch_one(pool)
    .await
    .map_err(|e| query_error(table, e))?;

    Ok(version_from_db(last))
}

/// Whether a version has a successful entry. Rows left behind by failed
/// attempts (state = false) do not count.
pub async fn is_applied(pool: &PgPool, table: &str, version: u64) -> MigrateResult<bool> {
    let table_ident = quote_identifier(table)?;

    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {table_ident} WHERE version = $1 AND state = TRUE"
    ))
    .bind(version_to_db(version)?)
    .fetch_one(pool)
    .await
    .map_err(|e| query_error(table, e))?;

    Ok(count > 0)
}

/// Record that an apply attempt is starting. Runs outside the migration's
/// transaction so a failed run leaves a state = false row behind. A leftover
/// row from an earlier attempt is reused, refreshing the file name.
pub async fn record_attempt(
    pool: &PgPool,
    table: &str,
    migration: &MigrationFile,
) -> MigrateResult<()> {
    let table_ident = quote_identifier(table)?;

    sqlx::query(&format!(
        "INSERT INTO {table_ident} (version, file_name) VALUES ($1, $2) \
         ON CONFLICT (version) DO UPDATE SET file_name = EXCLUDED.file_name"
    ))
    .bind(version_to_db(migration.version)?)
    .bind(&migration.file_name)
    .execute(pool)
    .await
    .map_err(|e| MigrateError::RecordAttempt {
        version: migration.version,
        source: e,
    })?;

    Ok(())
}

/// Flip a migration's entry to applied. Executed on the migration's own
/// transaction so the mark commits or rolls back with the SQL it describes.
pub async fn mark_applied<'e, E>(executor: E, table: &str, version: u64) -> MigrateResult<()>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let table_ident = quote_identifier(table)?;

    let result = sqlx::query(&format!(
        "UPDATE {table_ident} SET state = TRUE WHERE version = $1"
    ))
    .bind(version_to_db(version)?)
    .execute(executor)
    .await
    .map_err(|e| MigrateError::MarkApplied { version, source: e })?;

    // The attempt row is written before the transaction starts, so an
    // untouched row means the changelog was modified underneath us.
    if result.rows_affected() == 0 {
        return Err(MigrateError::MarkApplied {
            version,
            source: sqlx::Error::RowNotFound,
        });
    }

    Ok(())
}

/// All successful entries, oldest version first.
pub async fn applied_entries(pool: &PgPool, table: &str) -> MigrateResult<Vec<ChangelogEntry>> {
    let table_ident = quote_identifier(table)?;

    let rows = sqlx::query(&format!(
        "SELECT version, file_name, applied_by, date_time FROM {table_ident} \
         WHERE state = TRUE ORDER BY version"
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| query_error(table, e))?;

    Ok(rows
        .into_iter()
        .map(|row| ChangelogEntry {
            version: version_from_db(row.get("version")),
            file_name: row.get("file_name"),
            applied_by: row.get("applied_by"),
            date_time: row.get("date_time"),
        })
        .collect())
}
