// crates/gov-cli/src/output.rs
// ============================================================================
// Module: CLI Output
// Description: stdout helpers routed through `io::Write` directly rather
//              than `println!`/`eprintln!`.
// ============================================================================

use std::io::Write;

use serde::Serialize;

use crate::error::CliError;

/// Writes `message` to stdout followed by a newline.
pub fn write_line(message: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{message}")?;
    Ok(())
}

/// Serializes `value` as pretty JSON and writes it to stdout.
pub fn write_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| CliError::SessionFormat {
        path: "<stdout>".to_string(),
        source,
    })?;
    write_line(&text)
}

/// Writes `message` to stderr followed by a newline.
pub fn write_error_line(message: &str) -> Result<(), CliError> {
    let mut stderr = std::io::stderr();
    writeln!(stderr, "{message}")?;
    Ok(())
}
