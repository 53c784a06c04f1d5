pub mod reporter;

pub use reporter::{ApplyReporter, format_duration};
