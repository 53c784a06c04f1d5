pub mod apply;
pub mod init;
pub mod status;

// Re-export all command functions
pub use apply::{ApplyOutcome, cmd_apply};
pub use init::cmd_init;
pub use status::cmd_status;
