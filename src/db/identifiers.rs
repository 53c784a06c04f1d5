use crate::error::{MigrateError, MigrateResult};

/// Strip every character outside the PostgreSQL identifier set
/// (ASCII letters, digits, `_`, `@`, `$`).
pub fn sanitize_identifier(input: &str) -> MigrateResult<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '$'))
        .collect();

    if cleaned.is_empty() {
        return Err(MigrateError::InvalidIdentifier {
            input: input.to_string(),
        });
    }

    Ok(cleaned)
}

/// Sanitize an identifier and wrap it in double quotes so it can be
/// interpolated into SQL text. Bound parameters cannot carry identifiers,
/// so every table name goes through here before formatting.
pub fn quote_identifier(input: &str) -> MigrateResult<String> {
    Ok(format!("\"{}\"", sanitize_identifier(input)?))
}
