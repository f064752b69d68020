// crates/gov-config/src/error.rs
// ============================================================================
// Module: Config Errors
// Description: Failure kinds produced while loading and validating layered
//              configuration.
// ============================================================================

use thiserror::Error;

/// Failure kinds produced by [`crate::loader`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read from disk.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file's contents are not valid TOML.
    #[error("failed to parse {path} as TOML: {source}")]
    Parse {
        /// The path whose contents failed to parse.
        path: String,
        /// The underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// A loaded value failed a semantic validation rule.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for gov_core::GovernanceError {
    fn from(err: ConfigError) -> Self {
        gov_core::GovernanceError::InvalidState { reason: err.to_string() }
    }
}
