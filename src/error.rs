use std::path::PathBuf;
use thiserror::Error;

pub type MigrateResult<T> = Result<T, MigrateError>;

/// Failure classes of a migration run. Every variant aborts the operation
/// that produced it; there are no retries.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("failed to read migrations directory '{}'", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid migration file name '{file_name}': {reason}")]
    InvalidFileName {
        file_name: String,
        reason: &'static str,
    },

    #[error("found migrations with the same version #{version}:\n- {first}\n- {second}")]
    DuplicateVersion {
        version: u64,
        first: String,
        second: String,
    },

    #[error("invalid SQL identifier '{input}': nothing left after removing unsupported characters")]
    InvalidIdentifier { input: String },

    #[error("migration version {version} does not fit in the changelog's BIGINT column")]
    VersionOutOfRange { version: u64 },

    #[error("failed to create changelog table \"{table}\"")]
    CreateChangelog {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to query changelog table \"{table}\"")]
    ChangelogQuery {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to record migration #{version} in the changelog")]
    RecordAttempt {
        version: u64,
        #[source]
        source: sqlx::Error,
    },

    #[error(
        "failed to mark migration #{version} as applied; the transaction was rolled back, \
         but statements PostgreSQL runs outside transactions may have persisted. \
         Verify the database state and reconcile the changelog manually"
    )]
    MarkApplied {
        version: u64,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to read migration file '{}'", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("migration #{version} from file {file_name} failed:\n{detail}")]
    Execution {
        version: u64,
        file_name: String,
        detail: String,
    },

    #[error("failed to commit migration #{version}")]
    Commit {
        version: u64,
        #[source]
        source: sqlx::Error,
    },
}
