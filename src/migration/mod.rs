pub mod applier;
pub mod parsing;
pub mod pending;

pub use applier::MigrationApplier;
pub use parsing::{MigrationFile, discover_migrations, parse_migration_filename};
pub use pending::pending_migrations;
