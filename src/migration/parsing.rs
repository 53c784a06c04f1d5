use crate::error::{MigrateError, MigrateResult};
use std::path::{Path, PathBuf};

/// A migration file discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub path: PathBuf,
    /// Numeric prefix of the file name, unique within a directory
    pub version: u64,
    /// Human-readable name: underscores become spaces, extension dropped
    pub title: String,
    pub file_name: String,
}

/// Parse a migration file name like "0042_add_user_index.sql" into its
/// version and title. The version is everything before the first underscore;
/// leading zeros are allowed and version 0 is valid.
pub fn parse_migration_filename(file_name: &str) -> MigrateResult<(u64, String)> {
    let Some((prefix, rest)) = file_name.split_once('_') else {
        return Err(MigrateError::InvalidFileName {
            file_name: file_name.to_string(),
            reason: "expected '<version>_<title>' with an underscore separator",
        });
    };

    let version = prefix
        .parse::<u64>()
        .map_err(|_| MigrateError::InvalidFileName {
            file_name: file_name.to_string(),
            reason: "file name does not start with a numeric version",
        })?;

    if rest.is_empty() {
        return Err(MigrateError::InvalidFileName {
            file_name: file_name.to_string(),
            reason: "missing title after the version number",
        });
    }

    Ok((version, title_from(rest)))
}

fn title_from(rest: &str) -> String {
    let stem = match rest.rfind('.') {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    stem.replace('_', " ")
}

/// Find all migration files in a directory, sorted by version.
///
/// Every regular file must carry a valid name and a unique version; the
/// first offender aborts the scan. Subdirectories are ignored.
pub fn discover_migrations(migrations_dir: &Path) -> MigrateResult<Vec<MigrationFile>> {
    let read_dir = std::fs::read_dir(migrations_dir).map_err(|e| MigrateError::DirectoryAccess {
        path: migrations_dir.to_path_buf(),
        source: e,
    })?;

    let mut migrations: Vec<MigrationFile> = Vec::new();

    for entry in read_dir {
        let entry = entry.map_err(|e| MigrateError::DirectoryAccess {
            path: migrations_dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let (version, title) = parse_migration_filename(&file_name)?;

        if let Some(existing) = migrations.iter().find(|m| m.version == version) {
            return Err(MigrateError::DuplicateVersion {
                version,
                first: existing.file_name.clone(),
                second: file_name,
            });
        }

        migrations.push(MigrationFile {
            path,
            version,
            title,
            file_name,
        });
    }

    migrations.sort_by_key(|m| m.version);

    Ok(migrations)
}
