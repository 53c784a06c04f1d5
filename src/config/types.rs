use clap::Args;
use serde::{Deserialize, Serialize};

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub connection: Option<ConnectionInput>,
    pub migrations: Option<MigrationsInput>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub connection: Connection,
    pub migrations: Migrations,
}

// Connection configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConnectionInput {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub ssl_mode: Option<String>,
    pub interactive: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Connection {
    /// Full connection URL. When set, the individual parts are ignored and
    /// no password is resolved separately.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub ssl_mode: String,
    /// Whether a missing password may be prompted for on a terminal
    pub interactive: bool,
}

// Migration file configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MigrationsInput {
    pub dir: Option<String>,
    pub changelog_table: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Migrations {
    pub dir: String,
    pub changelog_table: String,
}

// CLI argument groups shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    #[arg(long, help = "Database URL (overrides host/port/database/username)")]
    pub url: Option<String>,

    #[arg(long, help = "Database server host")]
    pub host: Option<String>,

    #[arg(long, help = "Database server port")]
    pub port: Option<u16>,

    #[arg(long, help = "Database name")]
    pub database: Option<String>,

    #[arg(long, short = 'U', help = "Database user")]
    pub username: Option<String>,

    #[arg(
        long,
        help = "SSL mode (disable, allow, prefer, require, verify-ca, verify-full)"
    )]
    pub ssl_mode: Option<String>,

    #[arg(long, help = "Never prompt for a password")]
    pub no_interactive: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct MigrationsArgs {
    #[arg(long, help = "Migrations directory path")]
    pub dir: Option<String>,

    #[arg(long, help = "Changelog table name")]
    pub changelog_table: Option<String>,
}

// Conversion functions from CLI args to config input
impl From<ConnectionArgs> for ConnectionInput {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            url: args.url,
            host: args.host,
            port: args.port,
            database: args.database,
            username: args.username,
            ssl_mode: args.ssl_mode,
            interactive: if args.no_interactive { Some(false) } else { None },
        }
    }
}

impl From<MigrationsArgs> for MigrationsInput {
    fn from(args: MigrationsArgs) -> Self {
        Self {
            dir: args.dir,
            changelog_table: args.changelog_table,
        }
    }
}
