// crates/gov-metering/src/quota.rs
// ============================================================================
// Module: Tenant Quota
// Description: Per-tenant usage ceilings and the status they evaluate to
//              (§4.I Quota evaluation).
// ============================================================================

use gov_core::identifiers::TenantId;
use serde::Deserialize;
use serde::Serialize;

/// A metered resource a [`TenantQuota`] tracks a ceiling for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaMetric {
    /// Agent invocation count.
    AgentInvocations,
    /// Combined input and output token count.
    Tokens,
    /// Bytes of tenant-scoped storage.
    Storage,
    /// API call count.
    ApiCalls,
}

/// Where a metric's usage falls relative to its configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaStatus {
    /// Usage is below `warning_threshold`.
    Ok,
    /// Usage is at or above `warning_threshold` but below `critical_threshold`.
    Warning,
    /// Usage is at or above `critical_threshold` but below 100%.
    Critical,
    /// Usage is at or above 100% of the configured limit.
    Exceeded,
}

/// Per-tenant usage ceilings and running counters (§4.I Quota evaluation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantQuota {
    /// The tenant this quota applies to.
    pub tenant_id: TenantId,
    /// Ceiling on agent invocations for the current period.
    pub max_agent_invocations: u64,
    /// Ceiling on combined input/output tokens for the current period.
    pub max_tokens: u64,
    /// Ceiling on storage bytes.
    pub max_storage_bytes: u64,
    /// Ceiling on API calls for the current period.
    pub max_api_calls: u64,
    /// Agent invocations consumed so far in the current period.
    pub current_agent_invocations: u64,
    /// Tokens consumed so far in the current period.
    pub current_tokens: u64,
    /// Storage bytes consumed so far.
    pub current_storage_bytes: u64,
    /// API calls consumed so far in the current period.
    pub current_api_calls: u64,
    /// Usage percent at or above which a metric reports `Warning`.
    pub warning_threshold: f64,
    /// Usage percent at or above which a metric reports `Critical`.
    pub critical_threshold: f64,
}

impl TenantQuota {
    /// Builds a quota with the given limits, zeroed counters, and the
    /// default 80%/95% warning/critical thresholds.
    #[must_use]
    pub fn new(tenant_id: TenantId, max_agent_invocations: u64, max_tokens: u64, max_storage_bytes: u64, max_api_calls: u64) -> Self {
        Self {
            tenant_id,
            max_agent_invocations,
            max_tokens,
            max_storage_bytes,
            max_api_calls,
            current_agent_invocations: 0,
            current_tokens: 0,
            current_storage_bytes: 0,
            current_api_calls: 0,
            warning_threshold: 80.0,
            critical_threshold: 95.0,
        }
    }

    fn current_and_max(&self, metric: QuotaMetric) -> (u64, u64) {
        match metric {
            QuotaMetric::AgentInvocations => (self.current_agent_invocations, self.max_agent_invocations),
            QuotaMetric::Tokens => (self.current_tokens, self.max_tokens),
            QuotaMetric::Storage => (self.current_storage_bytes, self.max_storage_bytes),
            QuotaMetric::ApiCalls => (self.current_api_calls, self.max_api_calls),
        }
    }

    /// Returns `current / max * 100`, or `0.0` when `max` is `0` (an
    /// unconfigured/unlimited metric never reports usage).
    #[must_use]
    pub fn usage_percent(&self, metric: QuotaMetric) -> f64 {
        let (current, max) = self.current_and_max(metric);
        if max == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss, reason = "usage ratios are inherently approximate")]
        let percent = (current as f64 / max as f64) * 100.0;
        percent
    }

    /// Classifies `metric`'s usage against this quota's thresholds.
    #[must_use]
    pub fn status(&self, metric: QuotaMetric) -> QuotaStatus {
        let percent = self.usage_percent(metric);
        if percent >= 100.0 {
            QuotaStatus::Exceeded
        } else if percent >= self.critical_threshold {
            QuotaStatus::Critical
        } else if percent >= self.warning_threshold {
            QuotaStatus::Warning
        } else {
            QuotaStatus::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use gov_core::identifiers::TenantId;

    use super::QuotaMetric;
    use super::QuotaStatus;
    use super::TenantQuota;

    #[test]
    fn usage_percent_divides_current_by_max() {
        let mut quota = TenantQuota::new(TenantId::new("t1"), 1000, 100_000, 0, 10_000);
        quota.current_agent_invocations = 500;
        quota.current_tokens = 80_000;
        quota.current_api_calls = 5_000;

        assert!((quota.usage_percent(QuotaMetric::AgentInvocations) - 50.0).abs() < f64::EPSILON);
        assert!((quota.usage_percent(QuotaMetric::Tokens) - 80.0).abs() < f64::EPSILON);
        assert!((quota.usage_percent(QuotaMetric::ApiCalls) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn status_buckets_match_thresholds() {
        let mut quota = TenantQuota::new(TenantId::new("t1"), 1000, 100_000, 10_000_000_000, 10_000);
        quota.current_agent_invocations = 500; // 50% -> ok
        quota.current_tokens = 85_000; // 85% -> warning
        quota.current_storage_bytes = 9_800_000_000; // 98% -> critical
        quota.current_api_calls = 10_000; // 100% -> exceeded

        assert_eq!(quota.status(QuotaMetric::AgentInvocations), QuotaStatus::Ok);
        assert_eq!(quota.status(QuotaMetric::Tokens), QuotaStatus::Warning);
        assert_eq!(quota.status(QuotaMetric::Storage), QuotaStatus::Critical);
        assert_eq!(quota.status(QuotaMetric::ApiCalls), QuotaStatus::Exceeded);
    }

    #[test]
    fn unconfigured_limit_never_reports_usage() {
        let quota = TenantQuota::new(TenantId::new("t1"), 0, 0, 0, 0);
        assert!((quota.usage_percent(QuotaMetric::AgentInvocations) - 0.0).abs() < f64::EPSILON);
        assert_eq!(quota.status(QuotaMetric::AgentInvocations), QuotaStatus::Ok);
    }
}
