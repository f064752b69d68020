// crates/gov-cli/src/error.rs
// ============================================================================
// Module: CLI Errors
// Description: The error type the command dispatcher surfaces, wrapping
//              every subsystem crate's error plus local I/O failures.
// ============================================================================

use thiserror::Error;

/// Failure kinds the CLI's command dispatcher can surface.
#[derive(Debug, Error)]
pub enum CliError {
    /// A governance command returned an error (§7 error kinds).
    #[error(transparent)]
    Governance(#[from] gov_core::GovernanceError),
    /// Loading or validating `governance.toml` failed.
    #[error(transparent)]
    Config(#[from] gov_config::ConfigError),
    /// Reading or writing the session snapshot file failed.
    #[error("session file {path}: {source}")]
    Session {
        /// The session file path involved.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The session file's contents were not valid JSON.
    #[error("session file {path} is not valid JSON: {source}")]
    SessionFormat {
        /// The session file path involved.
        path: String,
        /// The underlying parse/serialize failure.
        #[source]
        source: serde_json::Error,
    },
    /// An ops-file input could not be read or parsed.
    #[error("input file {path}: {source}")]
    Input {
        /// The input file path involved.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// An ops-file's contents were not valid JSON.
    #[error("input file {path} is not valid JSON: {source}")]
    InputFormat {
        /// The input file path involved.
        path: String,
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// A command-line argument failed validation the clap parser itself
    /// can't express (e.g. an unrecognized enum string from a free-text
    /// field).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// CLI result alias for fallible operations.
pub type CliResult<T> = Result<T, CliError>;
