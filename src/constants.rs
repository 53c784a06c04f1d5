// Configuration file name
pub const CONFIG_FILENAME: &str = "pgup.yaml";

// Defaults applied when neither the config file, CLI flags, nor the
// environment provide a value
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";
pub const DEFAULT_CHANGELOG_TABLE: &str = "changelog";
