// crates/gov-config/src/loader.rs
// ============================================================================
// Module: Config Loader
// Description: Loads `governance.toml`, falling back to defaults when absent,
//              then validates the result.
// ============================================================================

use std::path::Path;

use crate::error::ConfigError;
use crate::settings::GovernanceSettings;

/// Loads settings from `path`, or returns [`GovernanceSettings::default`] if
/// the file does not exist. A present-but-unreadable or malformed file is
/// still an error.
///
/// # Errors
/// Returns [`ConfigError::Io`] if `path` exists but can't be read,
/// [`ConfigError::Parse`] if its contents aren't valid TOML, or
/// [`ConfigError::Invalid`] if the parsed settings fail validation.
pub fn load(path: &Path) -> Result<GovernanceSettings, ConfigError> {
    if !path.exists() {
        let settings = GovernanceSettings::default();
        settings.validate()?;
        return Ok(settings);
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let settings: GovernanceSettings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from `path` if given, else [`GovernanceSettings::default`],
/// then overlays environment variables of the form `GOV_<SECTION>_<FIELD>`
/// (for example `GOV_SCALING_MAX_WORKERS`) over string/integer/bool leaves.
///
/// # Errors
/// Propagates [`load`]'s errors, plus [`ConfigError::Invalid`] if an
/// environment override fails to parse as its field's type.
pub fn load_with_env_overrides(path: Option<&Path>, env: &[(String, String)]) -> Result<GovernanceSettings, ConfigError> {
    let mut settings = match path {
        Some(path) => load(path)?,
        None => GovernanceSettings::default(),
    };

    for (key, value) in env {
        apply_override(&mut settings, key, value)?;
    }

    settings.validate()?;
    Ok(settings)
}

/// Applies one `GOV_<SECTION>_<FIELD>=value` override onto `settings`.
fn apply_override(settings: &mut GovernanceSettings, key: &str, value: &str) -> Result<(), ConfigError> {
    let Some(rest) = key.strip_prefix("GOV_") else {
        return Ok(());
    };
    let parse_u64 = |v: &str| v.parse::<u64>().map_err(|_| ConfigError::Invalid(format!("{key} must be an unsigned integer, got {v:?}")));
    let parse_u32 = |v: &str| v.parse::<u32>().map_err(|_| ConfigError::Invalid(format!("{key} must be an unsigned integer, got {v:?}")));
    let parse_usize = |v: &str| v.parse::<usize>().map_err(|_| ConfigError::Invalid(format!("{key} must be an unsigned integer, got {v:?}")));
    let parse_i64 = |v: &str| v.parse::<i64>().map_err(|_| ConfigError::Invalid(format!("{key} must be a signed integer, got {v:?}")));
    let parse_bool = |v: &str| v.parse::<bool>().map_err(|_| ConfigError::Invalid(format!("{key} must be true or false, got {v:?}")));

    match rest {
        "RETRY_MAX_RETRIES" => settings.retry.max_retries = parse_u32(value)?,
        "RETRY_BASE_DELAY_SECS" => settings.retry.base_delay_secs = parse_u64(value)?,
        "RETRY_MAX_DELAY_SECS" => settings.retry.max_delay_secs = parse_u64(value)?,
        "RETRY_JITTER" => settings.retry.jitter = parse_bool(value)?,
        "SCALING_MIN_WORKERS" => settings.scaling.min_workers = parse_u32(value)?,
        "SCALING_MAX_WORKERS" => settings.scaling.max_workers = parse_u32(value)?,
        "SCALING_SCALE_UP_THRESHOLD" => settings.scaling.scale_up_threshold = parse_usize(value)?,
        "SCALING_SCALE_DOWN_THRESHOLD" => settings.scaling.scale_down_threshold = parse_usize(value)?,
        "SCALING_SCALE_UP_COOLDOWN_SECS" => settings.scaling.scale_up_cooldown_secs = parse_i64(value)?,
        "SCALING_SCALE_DOWN_COOLDOWN_SECS" => settings.scaling.scale_down_cooldown_secs = parse_i64(value)?,
        "QUOTA_DEFAULTS_MAX_TOKENS" => settings.quota_defaults.max_tokens = parse_u64(value)?,
        "QUOTA_DEFAULTS_MAX_STORAGE_BYTES" => settings.quota_defaults.max_storage_bytes = parse_u64(value)?,
        "QUOTA_DEFAULTS_MAX_AGENT_INVOCATIONS" => settings.quota_defaults.max_agent_invocations = parse_u64(value)?,
        "QUOTA_DEFAULTS_MAX_API_CALLS" => settings.quota_defaults.max_api_calls = parse_u64(value)?,
        _ => {}
    }
    Ok(())
}
