use crate::error::MigrateError;
use crate::migration::MigrationFile;
use console::style;
use std::time::Duration;

/// Per-migration console output during an apply run
pub struct ApplyReporter {
    total: usize,
    current: usize,
}

impl ApplyReporter {
    pub fn new(total: usize) -> Self {
        Self { total, current: 0 }
    }

    pub fn start(&mut self, migration: &MigrationFile) {
        self.current += 1;
        println!(
            "Applying migration #{} from file {} ({}/{})",
            migration.version, migration.file_name, self.current, self.total
        );
    }

    pub fn applied(&self, duration: Duration) {
        let duration_str = format_duration(duration);
        println!(
            "  {} applied in {}",
            style("✓").green(),
            style(&duration_str).green()
        );
    }

    pub fn failed(&self, error: &MigrateError) {
        println!("{} {}", style("✗").red(), style(error.to_string()).red());
    }
}

pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let millis = d.subsec_millis();

    if total_secs == 0 {
        format!("{}ms", millis)
    } else if total_secs < 60 {
        if millis > 0 {
            format!("{}.{}s", total_secs, millis / 100)
        } else {
            format!("{}s", total_secs)
        }
    } else {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m{}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    }
}
