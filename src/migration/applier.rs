use crate::changelog;
use crate::db::error_context::SqlErrorContext;
use crate::error::{MigrateError, MigrateResult};
use crate::migration::MigrationFile;
use crate::progress::ApplyReporter;
use sqlx::{Executor, PgPool};
use std::time::Instant;
use tracing::debug;

/// Applies pending migrations one at a time, in version order.
///
/// Each migration runs inside its own transaction together with the
/// changelog mark, so a file is either fully applied and recorded or rolled
/// back entirely. The first failure stops the run; migrations already
/// committed stay committed.
pub struct MigrationApplier {
    pool: PgPool,
    changelog_table: String,
    reporter: ApplyReporter,
}

impl MigrationApplier {
    pub fn new(pool: PgPool, changelog_table: String, reporter: ApplyReporter) -> Self {
        Self {
            pool,
            changelog_table,
            reporter,
        }
    }

    /// Apply every migration in the given order, stopping at the first
    /// failure. Returns the number applied.
    pub async fn apply_all(&mut self, migrations: &[MigrationFile]) -> MigrateResult<usize> {
        for migration in migrations {
            if let Err(e) = self.apply(migration).await {
                self.reporter.failed(&e);
                return Err(e);
            }
        }

        Ok(migrations.len())
    }

    /// Apply a single migration and mark it in the changelog.
    pub async fn apply(&mut self, migration: &MigrationFile) -> MigrateResult<()> {
        let sql = std::fs::read_to_string(&migration.path).map_err(|e| MigrateError::FileRead {
            path: migration.path.clone(),
            source: e,
        })?;

        self.reporter.start(migration);
        let start = Instant::now();

        // Written in autocommit mode, before the transaction: a failed run
        // leaves this row behind with state = false.
        changelog::record_attempt(&self.pool, &self.changelog_table, migration).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| MigrateError::Execution {
                version: migration.version,
                file_name: migration.file_name.clone(),
                detail: format!("failed to begin transaction: {}", e),
            })?;

        debug!(
            "executing migration #{} ({} bytes)",
            migration.version,
            sql.len()
        );

        if let Err(e) = tx.execute(sql.as_str()).await {
            let context = SqlErrorContext::from_sqlx_error(&e, &sql);
            let _ = tx.rollback().await;
            return Err(MigrateError::Execution {
                version: migration.version,
                file_name: migration.file_name.clone(),
                detail: context.format(&migration.file_name, &sql),
            });
        }

        if let Err(e) =
            changelog::mark_applied(&mut *tx, &self.changelog_table, migration.version).await
        {
            let _ = tx.rollback().await;
            return Err(e);
        }

        tx.commit()
            .await
            .map_err(|e| MigrateError::Commit {
                version: migration.version,
                source: e,
            })?;

        self.reporter.applied(start.elapsed());
        Ok(())
    }
}
