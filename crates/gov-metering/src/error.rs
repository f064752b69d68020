// crates/gov-metering/src/error.rs
// ============================================================================
// Module: Metering Errors
// Description: Failure kinds the metering/quota subsystem can produce.
// ============================================================================

use thiserror::Error;

/// Failure kinds produced by metering and quota operations.
#[derive(Debug, Error)]
pub enum MeteringError {
    /// No quota has been configured for this tenant.
    #[error("no quota configured for tenant {0}")]
    QuotaNotFound(String),
    /// Recording this event would push (or has pushed) a metric past its
    /// configured limit.
    #[error("quota exceeded: {resource} ({used}/{limit})")]
    QuotaExceeded {
        /// The metered resource whose quota was exceeded.
        resource: String,
        /// Units consumed so far in the current period.
        used: u64,
        /// The configured limit for the current period.
        limit: u64,
    },
}

impl From<MeteringError> for gov_core::GovernanceError {
    fn from(err: MeteringError) -> Self {
        match err {
            MeteringError::QuotaNotFound(tenant) => gov_core::GovernanceError::not_found("tenant_quota", tenant),
            MeteringError::QuotaExceeded { resource, used, limit } => gov_core::GovernanceError::QuotaExceeded { resource, used, limit },
        }
    }
}
