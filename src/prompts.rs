use crate::config::Config;
use anyhow::Result;
use dialoguer::Password;
use std::io::IsTerminal;

/// Resolve the database password for a parts-based connection.
///
/// PGPASSWORD wins when set; otherwise the user is prompted, but only when
/// interactive mode is on and stdin is a terminal. A URL-based connection
/// carries its credentials inline and resolves to no separate password.
pub fn resolve_password(config: &Config) -> Result<Option<String>> {
    if config.connection.url.is_some() {
        return Ok(None);
    }

    if let Ok(password) = std::env::var("PGPASSWORD")
        && !password.is_empty()
    {
        return Ok(Some(password));
    }

    if config.connection.interactive && std::io::stdin().is_terminal() {
        let password = Password::new()
            .with_prompt(format!(
                "Password for {}@{}",
                config.connection.username.as_deref().unwrap_or("postgres"),
                config.connection.host
            ))
            .allow_empty_password(true)
            .interact()?;

        if password.is_empty() {
            return Ok(None);
        }
        return Ok(Some(password));
    }

    Ok(None)
}
