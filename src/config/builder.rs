use crate::config::{merge::Merge, types::*};
use anyhow::{Context, Result};

/// Layers configuration sources in precedence order: defaults, then the
/// config file, then CLI flags. Environment variables fill fields left
/// unset by file and flags (DATABASE_URL plus the libpq-style PGHOST,
/// PGPORT, PGDATABASE, PGUSER, PGSSLMODE).
pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            connection: self.resolve_connection(&defaults.connection)?,
            migrations: self.resolve_migrations(&defaults.migrations),
        })
    }

    fn resolve_connection(&self, defaults: &Connection) -> Result<Connection> {
        let input = self.config_input.connection.as_ref();

        let port = match input.and_then(|c| c.port) {
            Some(port) => port,
            None => match env_var("PGPORT") {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("Invalid PGPORT value '{}'", raw))?,
                None => defaults.port,
            },
        };

        Ok(Connection {
            url: input
                .and_then(|c| c.url.as_ref())
                .cloned()
                .or_else(|| env_var("DATABASE_URL")),
            host: input
                .and_then(|c| c.host.as_ref())
                .cloned()
                .or_else(|| env_var("PGHOST"))
                .unwrap_or_else(|| defaults.host.clone()),
            port,
            database: input
                .and_then(|c| c.database.as_ref())
                .cloned()
                .or_else(|| env_var("PGDATABASE"))
                .unwrap_or_else(|| defaults.database.clone()),
            username: input
                .and_then(|c| c.username.as_ref())
                .cloned()
                .or_else(|| env_var("PGUSER")),
            ssl_mode: input
                .and_then(|c| c.ssl_mode.as_ref())
                .cloned()
                .or_else(|| env_var("PGSSLMODE"))
                .unwrap_or_else(|| defaults.ssl_mode.clone()),
            interactive: input
                .and_then(|c| c.interactive)
                .unwrap_or(defaults.interactive),
        })
    }

    fn resolve_migrations(&self, defaults: &Migrations) -> Migrations {
        let input = self.config_input.migrations.as_ref();

        Migrations {
            dir: input
                .and_then(|m| m.dir.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.dir.clone()),
            changelog_table: input
                .and_then(|m| m.changelog_table.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.changelog_table.clone()),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
