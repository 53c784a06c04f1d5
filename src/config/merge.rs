use crate::config::types::*;

/// Trait for merging optional configuration values
pub trait Merge<T> {
    fn merge(self, other: T) -> T;
}

impl<T> Merge<Option<T>> for Option<T> {
    fn merge(self, other: Option<T>) -> Option<T> {
        other.or(self)
    }
}

impl Merge<ConfigInput> for ConfigInput {
    fn merge(self, other: ConfigInput) -> ConfigInput {
        ConfigInput {
            connection: match (self.connection, other.connection) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
            migrations: match (self.migrations, other.migrations) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
        }
    }
}

// Field-wise merges: values from `other` win
impl ConnectionInput {
    pub fn merge_with(self, other: ConnectionInput) -> ConnectionInput {
        ConnectionInput {
            url: other.url.or(self.url),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            database: other.database.or(self.database),
            username: other.username.or(self.username),
            ssl_mode: other.ssl_mode.or(self.ssl_mode),
            interactive: other.interactive.or(self.interactive),
        }
    }
}

impl MigrationsInput {
    pub fn merge_with(self, other: MigrationsInput) -> MigrationsInput {
        MigrationsInput {
            dir: other.dir.or(self.dir),
            changelog_table: other.changelog_table.or(self.changelog_table),
        }
    }
}
