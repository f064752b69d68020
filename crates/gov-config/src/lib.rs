// crates/gov-config/src/lib.rs
// ============================================================================
// Crate: gov-config
// Description: Layered TOML + environment configuration for the subsystem
//              crates' tunables (component K, ambient stack).
// ============================================================================

//! # gov-config
//!
//! Loads `governance.toml` (or its built-in defaults, if absent) into
//! [`settings::GovernanceSettings`], overlays `GOV_*` environment variables,
//! and validates the cross-field invariants TOML's schema can't express.
//! This crate only depends on `gov-core`, leaving concrete subsystem-crate
//! conversions (`RetryPolicy`, `ScalingConfig`, `TenantQuota`) to `gov-cli`,
//! which already depends on every subsystem crate.

/// Failure kinds produced while loading or validating configuration.
pub mod error;
/// `governance.toml`'s file-reading and environment-overlay entry points.
pub mod loader;
/// The serde-deserializable settings shape.
pub mod settings;

pub use error::ConfigError;
pub use loader::load;
pub use loader::load_with_env_overrides;
pub use settings::GovernanceSettings;
pub use settings::IdentityEntry;
pub use settings::IdentitySettings;
pub use settings::QuotaDefaults;
pub use settings::RetrySettings;
pub use settings::ScalingSettings;
