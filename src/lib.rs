//! Versioned PostgreSQL migrations: ordered SQL files applied exactly once,
//! tracked in a changelog table.

pub mod changelog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod migration;
pub mod progress;
pub mod prompts;
