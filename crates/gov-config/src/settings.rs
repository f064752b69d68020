// crates/gov-config/src/settings.rs
// ============================================================================
// Module: Settings
// Description: The serde-deserializable shape of `governance.toml`, one
//              section per subsystem crate's tunables (§4.K).
// ============================================================================

//! ## Overview
//! `gov-config` deliberately mirrors each subsystem crate's tunables as its
//! own plain-data settings structs rather than depending on
//! `gov-scheduler`/`gov-queue`/`gov-metering` directly. The
//! command surface (`gov-cli`), which already depends on every subsystem
//! crate, converts these into the concrete `RetryPolicy`/`ScalingConfig`/
//! `TenantQuota` values at startup.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// Mirrors `gov_scheduler::RetryPolicy`'s fields for TOML deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Number of times a task may be retried before it is marked `failed`.
    pub max_retries: u32,
    /// Base delay, in seconds, for the exponential backoff curve.
    pub base_delay_secs: u64,
    /// Upper bound on the computed delay, in seconds.
    pub max_delay_secs: u64,
    /// Whether to scale the computed delay by a `[0.5, 1.5]` jitter factor.
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_secs: 1,
            max_delay_secs: 300,
            jitter: true,
        }
    }
}

/// Mirrors `gov_queue::ScalingConfig`'s fields for TOML deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingSettings {
    /// The floor worker count never goes below.
    pub min_workers: u32,
    /// The ceiling worker count never exceeds.
    pub max_workers: u32,
    /// Queue depth at or above which a scale-up is considered.
    pub scale_up_threshold: usize,
    /// Queue depth at or below which a scale-down is considered.
    pub scale_down_threshold: usize,
    /// Workers added by a single scale-up action.
    pub scale_up_increment: u32,
    /// Workers removed by a single scale-down action.
    pub scale_down_increment: u32,
    /// Minimum seconds between consecutive scale-up actions.
    pub scale_up_cooldown_secs: i64,
    /// Minimum seconds between consecutive scale-down actions.
    pub scale_down_cooldown_secs: i64,
}

impl Default for ScalingSettings {
    fn default() -> Self {
        Self {
            min_workers: 1,
            max_workers: 5,
            scale_up_threshold: 5,
            scale_down_threshold: 0,
            scale_up_increment: 2,
            scale_down_increment: 1,
            scale_up_cooldown_secs: 60,
            scale_down_cooldown_secs: 120,
        }
    }
}

/// Default per-tenant quota ceilings applied when a tenant has no explicit
/// `TenantQuota` registered (§4.I).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaDefaults {
    /// Default ceiling on agent invocations for the current period.
    pub max_agent_invocations: u64,
    /// Default ceiling on combined input/output tokens.
    pub max_tokens: u64,
    /// Default ceiling on storage bytes.
    pub max_storage_bytes: u64,
    /// Default ceiling on API calls.
    pub max_api_calls: u64,
}

impl Default for QuotaDefaults {
    fn default() -> Self {
        Self {
            max_agent_invocations: 10_000,
            max_tokens: 50_000_000,
            max_storage_bytes: 10 * 1024 * 1024 * 1024,
            max_api_calls: 100_000,
        }
    }
}

/// A single `subject` a `token` resolves to, loaded into a
/// `StaticIdentityVerifier` at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEntry {
    /// The opaque bearer token text.
    pub token: String,
    /// The subject the token attests to.
    pub subject: String,
}

/// The `[identity]` section: the static token→subject table used when no
/// production `IdentityVerifier` is wired in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    /// Registered tokens and the subjects they resolve to.
    pub tokens: Vec<IdentityEntry>,
}

/// The full `governance.toml` shape: one section per subsystem crate plus
/// ambient deployment settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceSettings {
    /// Scheduler retry/backoff tunables (§4.G).
    pub retry: RetrySettings,
    /// Queue auto-scaler tunables (§4.H).
    pub scaling: ScalingSettings,
    /// Default per-tenant quota ceilings (§4.I).
    pub quota_defaults: QuotaDefaults,
    /// Static access-token identity table (§4.J).
    pub identity: IdentitySettings,
}

impl GovernanceSettings {
    /// Validates cross-field invariants TOML's schema can't express on its
    /// own: scaling bounds must be orderable, retry bounds must be
    /// non-degenerate.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] on the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scaling.min_workers > self.scaling.max_workers {
            return Err(ConfigError::Invalid(format!(
                "scaling.min_workers ({}) exceeds scaling.max_workers ({})",
                self.scaling.min_workers, self.scaling.max_workers
            )));
        }
        if self.scaling.scale_down_threshold > self.scaling.scale_up_threshold {
            return Err(ConfigError::Invalid(format!(
                "scaling.scale_down_threshold ({}) exceeds scaling.scale_up_threshold ({})",
                self.scaling.scale_down_threshold, self.scaling.scale_up_threshold
            )));
        }
        if self.retry.base_delay_secs > self.retry.max_delay_secs {
            return Err(ConfigError::Invalid(format!(
                "retry.base_delay_secs ({}) exceeds retry.max_delay_secs ({})",
                self.retry.base_delay_secs, self.retry.max_delay_secs
            )));
        }
        Ok(())
    }
}
