// crates/gov-metering/src/aggregate.rs
// ============================================================================
// Module: Usage Aggregate
// Description: Period-summed counters returned by `aggregate` (§4.I).
// ============================================================================

use gov_core::Timestamp;
use gov_core::identifiers::TenantId;
use serde::Deserialize;
use serde::Serialize;

/// Sums of [`crate::event::UsageEvent`]s falling inside `[period_start,
/// period_end)` for one tenant (§4.I `aggregate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageAggregate {
    /// The tenant these sums belong to.
    pub tenant_id: TenantId,
    /// The caller-supplied period label (`"hourly"`, `"daily"`, `"monthly"`, ...).
    pub period: String,
    /// Inclusive start of the period.
    pub period_start: Timestamp,
    /// Exclusive end of the period.
    pub period_end: Timestamp,
    /// Count of `AgentInvocation` events in the period.
    pub agent_invocations: u64,
    /// Count of `ApiCall` events in the period.
    pub api_calls: u64,
    /// Sum of `tokens_in` across every event in the period.
    pub tokens_in: u64,
    /// Sum of `tokens_out` across every event in the period.
    pub tokens_out: u64,
    /// Sum of `bytes` across `StorageWrite` events in the period.
    pub storage_bytes_written: u64,
    /// Sum of `bytes` across `StorageRead` events in the period.
    pub storage_bytes_read: u64,
}

impl UsageAggregate {
    /// Returns `tokens_in + tokens_out`.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.tokens_in + self.tokens_out
    }

    /// Returns `storage_bytes_written + storage_bytes_read`.
    #[must_use]
    pub fn total_storage_bytes(&self) -> u64 {
        self.storage_bytes_written + self.storage_bytes_read
    }
}
