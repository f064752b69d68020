// crates/gov-metering/src/manager.rs
// ============================================================================
// Module: Metering Store
// Description: In-process event ledger and quota tracker driving
//              `recordEvent`/`aggregate`/quota evaluation (§4.I).
// ============================================================================

use std::collections::HashMap;
use std::sync::Mutex;

use gov_core::TenantContext;
use gov_core::identifiers::TenantId;
use tracing::info;
use tracing::warn;

use crate::error::MeteringError;
use crate::event::EventType;
use crate::event::UsageEvent;
use crate::quota::QuotaMetric;
use crate::quota::QuotaStatus;
use crate::quota::TenantQuota;
use crate::aggregate::UsageAggregate;
use gov_core::Timestamp;

#[derive(Debug, Default)]
struct TenantState {
    events: Vec<UsageEvent>,
    quota: Option<TenantQuota>,
}

/// The in-process event ledger and quota tracker for every tenant.
///
/// Unlike `gov-workflow`'s engines, this store is not `Repository`-backed:
/// usage events are high-volume operational telemetry, not the compliance
/// audit trail `gov-audit` maintains.
#[derive(Debug, Default)]
pub struct MeteringStore {
    tenants: Mutex<HashMap<TenantId, TenantState>>,
}

impl MeteringStore {
    /// Builds an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tenant<R>(&self, tenant_id: &TenantId, f: impl FnOnce(&mut TenantState) -> R) -> R {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut tenants = self.tenants.lock().unwrap();
        let state = tenants.entry(tenant_id.clone()).or_default();
        f(state)
    }

    /// Records a usage event for `ctx.tenant_id`, updating that tenant's
    /// running quota counters if one is configured (§4.I `recordEvent`).
    pub fn record_event(&self, ctx: &TenantContext, event_type: EventType, quantity: u64, tokens_in: u64, tokens_out: u64, bytes: u64) -> UsageEvent {
        let event = UsageEvent::new(event_type, ctx.tenant_id.clone(), quantity, tokens_in, tokens_out, bytes);
        self.with_tenant(&ctx.tenant_id, |state| {
            if let Some(quota) = state.quota.as_mut() {
                apply_to_quota(quota, &event);
            }
            state.events.push(event.clone());
        });
        info!(tenant_id = %ctx.tenant_id, event_type = ?event.event_type, quantity, "usage event recorded");
        event
    }

    /// Configures (or replaces) the quota tracked for `quota.tenant_id`.
    pub fn set_quota(&self, quota: TenantQuota) {
        self.with_tenant(&quota.tenant_id.clone(), |state| {
            state.quota = Some(quota);
        });
    }

    /// Returns the quota configured for `tenant_id`, if any.
    #[must_use]
    pub fn get_quota(&self, tenant_id: &TenantId) -> Option<TenantQuota> {
        self.with_tenant(tenant_id, |state| state.quota.clone())
    }

    /// Evaluates `metric` against `tenant_id`'s configured quota.
    ///
    /// # Errors
    /// Returns [`MeteringError::QuotaNotFound`] if no quota is configured,
    /// or [`MeteringError::QuotaExceeded`] once usage reaches 100%.
    pub fn check_quota(&self, tenant_id: &TenantId, metric: QuotaMetric) -> Result<QuotaStatus, MeteringError> {
        let quota = self.get_quota(tenant_id).ok_or_else(|| MeteringError::QuotaNotFound(tenant_id.to_string()))?;
        let status = quota.status(metric);
        if matches!(status, QuotaStatus::Exceeded) {
            let (used, limit) = limit_for(&quota, metric);
            warn!(tenant_id = %tenant_id, ?metric, used, limit, "tenant quota exceeded");
            return Err(MeteringError::QuotaExceeded {
                resource: metric_label(metric).to_string(),
                used,
                limit,
            });
        }
        Ok(status)
    }

    /// Sums every event for `tenant_id` whose timestamp falls inside
    /// `[period_start, period_end)` (§4.I `aggregate`).
    #[must_use]
    pub fn aggregate(&self, tenant_id: &TenantId, period: impl Into<String>, period_start: Timestamp, period_end: Timestamp) -> UsageAggregate {
        self.with_tenant(tenant_id, |state| {
            let mut aggregate = UsageAggregate {
                tenant_id: tenant_id.clone(),
                period: period.into(),
                period_start,
                period_end,
                agent_invocations: 0,
                api_calls: 0,
                tokens_in: 0,
                tokens_out: 0,
                storage_bytes_written: 0,
                storage_bytes_read: 0,
            };
            for event in state.events.iter().filter(|event| event.timestamp >= period_start && event.timestamp < period_end) {
                match event.event_type {
                    EventType::AgentInvocation => {
                        aggregate.agent_invocations += event.quantity;
                        aggregate.tokens_in += event.tokens_in;
                        aggregate.tokens_out += event.tokens_out;
                    }
                    EventType::ApiCall => aggregate.api_calls += event.quantity,
                    EventType::StorageWrite => aggregate.storage_bytes_written += event.bytes,
                    EventType::StorageRead => aggregate.storage_bytes_read += event.bytes,
                }
            }
            aggregate
        })
    }

    /// Returns every recorded event for `tenant_id`, optionally filtered to
    /// one [`EventType`].
    #[must_use]
    pub fn list_events(&self, tenant_id: &TenantId, event_type: Option<EventType>) -> Vec<UsageEvent> {
        self.with_tenant(tenant_id, |state| {
            state.events.iter().filter(|event| event_type.is_none_or(|wanted| event.event_type == wanted)).cloned().collect()
        })
    }
}

fn apply_to_quota(quota: &mut TenantQuota, event: &UsageEvent) {
    match event.event_type {
        EventType::AgentInvocation => {
            quota.current_agent_invocations += event.quantity;
            quota.current_tokens += event.total_tokens();
        }
        EventType::ApiCall => quota.current_api_calls += event.quantity,
        EventType::StorageWrite | EventType::StorageRead => quota.current_storage_bytes += event.bytes,
    }
}

fn limit_for(quota: &TenantQuota, metric: QuotaMetric) -> (u64, u64) {
    match metric {
        QuotaMetric::AgentInvocations => (quota.current_agent_invocations, quota.max_agent_invocations),
        QuotaMetric::Tokens => (quota.current_tokens, quota.max_tokens),
        QuotaMetric::Storage => (quota.current_storage_bytes, quota.max_storage_bytes),
        QuotaMetric::ApiCalls => (quota.current_api_calls, quota.max_api_calls),
    }
}

fn metric_label(metric: QuotaMetric) -> &'static str {
    match metric {
        QuotaMetric::AgentInvocations => "agent_invocations",
        QuotaMetric::Tokens => "tokens",
        QuotaMetric::Storage => "storage",
        QuotaMetric::ApiCalls => "api_calls",
    }
}

#[cfg(test)]
mod tests {
    use gov_core::ActorType;
    use gov_core::TenantContext;
    use gov_core::Timestamp;
    use gov_core::identifiers::TenantId;

    use super::MeteringStore;
    use crate::event::EventType;
    use crate::quota::QuotaMetric;
    use crate::quota::QuotaStatus;
    use crate::quota::TenantQuota;

    fn ctx(tenant: &str) -> TenantContext {
        TenantContext::new(TenantId::new(tenant), gov_core::identifiers::SessionId::new("s1"), "actor", ActorType::Human)
    }

    #[test]
    fn record_event_updates_quota_counters() {
        let store = MeteringStore::new();
        let tenant_id = TenantId::new("tenant-quota-test");
        store.set_quota(TenantQuota::new(tenant_id.clone(), 10, 1_000, 0, 0));

        store.record_event(&ctx("tenant-quota-test"), EventType::AgentInvocation, 1, 100, 50, 0);

        let quota = store.get_quota(&tenant_id).unwrap_or_else(|| panic!("quota should be set"));
        assert_eq!(quota.current_agent_invocations, 1);
        assert_eq!(quota.current_tokens, 150);
    }

    #[test]
    fn aggregate_sums_events_inside_the_window() {
        let store = MeteringStore::new();
        let context = ctx("tenant-agg-test");
        for _ in 0..5 {
            store.record_event(&context, EventType::AgentInvocation, 1, 100, 50, 0);
        }
        store.record_event(&context, EventType::ApiCall, 1, 0, 0, 0);
        store.record_event(&context, EventType::ApiCall, 1, 0, 0, 0);

        let now = Timestamp::now();
        let aggregate = store.aggregate(&TenantId::new("tenant-agg-test"), "hourly", now.plus_seconds(-3600), now.plus_seconds(3600));

        assert_eq!(aggregate.agent_invocations, 5);
        assert_eq!(aggregate.tokens_in, 500);
        assert_eq!(aggregate.tokens_out, 250);
        assert_eq!(aggregate.api_calls, 2);
    }

    #[test]
    fn check_quota_reports_exceeded_status_as_an_error() {
        let store = MeteringStore::new();
        let tenant_id = TenantId::new("tenant-exceeded");
        store.set_quota(TenantQuota::new(tenant_id.clone(), 1, 0, 0, 0));
        store.record_event(&ctx("tenant-exceeded"), EventType::AgentInvocation, 1, 0, 0, 0);

        let err = store.check_quota(&tenant_id, QuotaMetric::AgentInvocations).expect_err("quota should be exceeded");
        assert!(matches!(err, crate::error::MeteringError::QuotaExceeded { .. }));
    }

    #[test]
    fn check_quota_returns_warning_before_the_limit_is_reached() {
        let store = MeteringStore::new();
        let tenant_id = TenantId::new("tenant-warning");
        let mut quota = TenantQuota::new(tenant_id.clone(), 100, 0, 0, 0);
        quota.current_agent_invocations = 85;
        store.set_quota(quota);

        let status = store.check_quota(&tenant_id, QuotaMetric::AgentInvocations).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(status, QuotaStatus::Warning);
    }
}
