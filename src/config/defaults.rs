use crate::config::types::*;
use crate::constants::{DEFAULT_CHANGELOG_TABLE, DEFAULT_MIGRATIONS_DIR};

// Config itself derives Default

impl Default for Connection {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            username: None,
            ssl_mode: "prefer".to_string(),
            interactive: true,
        }
    }
}

impl Default for Migrations {
    fn default() -> Self {
        Self {
            dir: DEFAULT_MIGRATIONS_DIR.to_string(),
            changelog_table: DEFAULT_CHANGELOG_TABLE.to_string(),
        }
    }
}
