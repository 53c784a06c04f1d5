//! Extracts structured context from PostgreSQL errors so a failed migration
//! reports the offending line instead of a bare server message.

use sqlx::postgres::{PgDatabaseError, PgErrorPosition};

/// Error context extracted from a PostgreSQL error
#[derive(Debug, Clone)]
pub struct SqlErrorContext {
    /// The primary error message
    pub message: String,
    /// Line number in the migration file (converted from character position)
    pub line_number: Option<usize>,
    /// Additional detail from PostgreSQL
    pub detail: Option<String>,
    /// Hint for fixing the error
    pub hint: Option<String>,
}

impl SqlErrorContext {
    /// Extract error context from a sqlx error.
    ///
    /// Uses structured data from PgDatabaseError - no string parsing needed.
    pub fn from_sqlx_error(error: &sqlx::Error, sql_content: &str) -> Self {
        if let Some(db_error) = error.as_database_error()
            && let Some(pg_error) = db_error.try_downcast_ref::<PgDatabaseError>()
        {
            let position = pg_error.position().map(|pos| match pos {
                PgErrorPosition::Original(p) => p,
                PgErrorPosition::Internal { position, .. } => position,
            });

            return Self {
                message: pg_error.message().to_string(),
                line_number: position.map(|p| position_to_line(sql_content, p)),
                detail: pg_error.detail().map(|s| s.to_string()),
                hint: pg_error.hint().map(|s| s.to_string()),
            };
        }

        // Fallback for non-PostgreSQL errors
        Self {
            message: error.to_string(),
            line_number: None,
            detail: None,
            hint: None,
        }
    }

    /// Format the error for display with file context
    pub fn format(&self, file_name: &str, sql_content: &str) -> String {
        let mut msg = format!("SQL error in '{}'", file_name);

        if let Some(line) = self.line_number {
            msg.push_str(&format!(" at line {}", line));
        }
        msg.push_str(":\n\n");
        msg.push_str(&format!("  {}\n", self.message));

        if let Some(detail) = &self.detail {
            msg.push_str(&format!("\n  Detail: {}", detail));
        }
        if let Some(hint) = &self.hint {
            msg.push_str(&format!("\n  Hint: {}", hint));
        }

        if let Some(line) = self.line_number {
            msg.push_str(&format!("\n\n{}", format_line_context(sql_content, line)));
        }

        msg
    }
}

/// Convert 1-indexed character position to line number
pub fn position_to_line(content: &str, position: usize) -> usize {
    let end = (position.saturating_sub(1)).min(content.len());
    content[..end].chars().filter(|c| *c == '\n').count() + 1
}

/// Show the error line with a little surrounding SQL
pub fn format_line_context(content: &str, error_line: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let total_lines = lines.len();
    const CONTEXT_LINES: usize = 2;

    let error_idx = error_line.saturating_sub(1);
    let start_idx = error_idx.saturating_sub(CONTEXT_LINES);
    let end_idx = (error_idx + CONTEXT_LINES + 1).min(total_lines);

    let mut result = String::new();

    if start_idx > 0 {
        result.push_str(&format!("  ... [{} lines before]\n", start_idx));
    }

    for (idx, line) in lines[start_idx..end_idx].iter().enumerate() {
        let line_num = start_idx + idx + 1;
        let marker = if line_num == error_line { ">" } else { " " };
        result.push_str(&format!("  {} {:4} | {}\n", marker, line_num, line));
    }

    if end_idx < total_lines {
        result.push_str(&format!("  ... [{} lines after]", total_lines - end_idx));
    }

    result
}
