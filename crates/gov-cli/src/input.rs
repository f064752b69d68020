// crates/gov-cli/src/input.rs
// ============================================================================
// Module: CLI Input
// Description: Reads and parses JSON ops-files for commands whose input is
//              too structured for flat CLI flags (CDE scoring batches, DQ
//              threshold overrides).
// ============================================================================

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Reads `path` and parses its contents as JSON into `T`.
///
/// # Errors
/// Returns [`CliError::Input`] if `path` can't be read, or
/// [`CliError::InputFormat`] if its contents aren't valid JSON for `T`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::InputFormat {
        path: path.display().to_string(),
        source,
    })
}
