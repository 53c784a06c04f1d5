use crate::changelog;
use crate::error::MigrateResult;
use crate::migration::MigrationFile;
use sqlx::PgPool;
use tracing::debug;

/// Filter the catalog down to migrations without a successful changelog
/// entry, preserving ascending version order.
///
/// Every file is checked individually, so a migration added later with a
/// version below the newest applied one is still picked up.
pub async fn pending_migrations(
    pool: &PgPool,
    table: &str,
    catalog: &[MigrationFile],
) -> MigrateResult<Vec<MigrationFile>> {
    let mut pending = Vec::new();

    for migration in catalog {
        if changelog::is_applied(pool, table, migration.version).await? {
            debug!("migration #{} already applied, skipping", migration.version);
        } else {
            pending.push(migration.clone());
        }
    }

    Ok(pending)
}
