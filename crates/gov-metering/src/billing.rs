// crates/gov-metering/src/billing.rs
// ============================================================================
// Module: Billing Record
// Description: Per-period cost rollup derived from usage totals (§4.I
//              Billing record).
// ============================================================================

use gov_core::Timestamp;
use gov_core::identifiers::TenantId;
use gov_core::identifiers::generate_id;
use serde::Deserialize;
use serde::Serialize;

/// Per-unit cost rates applied when computing a [`BillingRecord`].
///
/// Defaults mirror the reference billing test fixtures: one cent per agent
/// invocation, two tenths of a cent per 1,000 tokens, ten cents per
/// storage gigabyte, one tenth of a cent per API call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRates {
    /// Cost per agent invocation.
    pub agent_invocation_unit_cost: f64,
    /// Cost per 1,000 combined input/output tokens.
    pub token_unit_cost_per_1000: f64,
    /// Cost per gigabyte of storage.
    pub storage_unit_cost_per_gb: f64,
    /// Cost per API call.
    pub api_call_unit_cost: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            agent_invocation_unit_cost: 0.01,
            token_unit_cost_per_1000: 0.002,
            storage_unit_cost_per_gb: 0.10,
            api_call_unit_cost: 0.001,
        }
    }
}

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A per-period cost rollup (§4.I Billing record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Unique identifier for this record.
    pub id: String,
    /// The tenant this record bills.
    pub tenant_id: TenantId,
    /// Inclusive start of the billed period.
    pub period_start: Timestamp,
    /// Exclusive end of the billed period.
    pub period_end: Timestamp,
    /// Agent invocations billed in this period.
    pub agent_invocations: u64,
    /// Combined input/output tokens billed in this period.
    pub total_tokens: u64,
    /// Storage gigabytes billed in this period.
    pub storage_gb: f64,
    /// API calls billed in this period.
    pub api_calls: u64,
    /// Cost attributed to agent invocations.
    pub agent_invocation_cost: f64,
    /// Cost attributed to token usage.
    pub token_cost: f64,
    /// Cost attributed to storage.
    pub storage_cost: f64,
    /// Cost attributed to API calls.
    pub api_call_cost: f64,
    /// Percentage discount applied to the subtotal.
    pub discount_percent: f64,
    /// Sum of the four per-metric costs, before discount.
    pub subtotal: f64,
    /// The amount subtracted from `subtotal` by `discount_percent`.
    pub discount_amount: f64,
    /// `subtotal - discount_amount`.
    pub total_amount: f64,
}

impl BillingRecord {
    /// Builds a billing record for `tenant_id` over `[period_start,
    /// period_end)`, computing every cost field from `rates` and
    /// `discount_percent` (§4.I: `subtotal = Σ(unit · unitCost)`,
    /// `total = subtotal · (1 − discountPercent/100)`).
    #[must_use]
    #[allow(clippy::too_many_arguments, reason = "mirrors the reference billing fixture's flat field list")]
    pub fn calculate(
        tenant_id: TenantId,
        period_start: Timestamp,
        period_end: Timestamp,
        agent_invocations: u64,
        total_tokens: u64,
        storage_bytes: u64,
        api_calls: u64,
        discount_percent: f64,
        rates: CostRates,
    ) -> Self {
        #[allow(clippy::cast_precision_loss, reason = "billing quantities are inherently approximate once converted to cost")]
        let storage_gb = storage_bytes as f64 / BYTES_PER_GB;
        #[allow(clippy::cast_precision_loss, reason = "billing quantities are inherently approximate once converted to cost")]
        let agent_invocation_cost = agent_invocations as f64 * rates.agent_invocation_unit_cost;
        #[allow(clippy::cast_precision_loss, reason = "billing quantities are inherently approximate once converted to cost")]
        let token_cost = (total_tokens as f64 / 1000.0) * rates.token_unit_cost_per_1000;
        let storage_cost = storage_gb * rates.storage_unit_cost_per_gb;
        #[allow(clippy::cast_precision_loss, reason = "billing quantities are inherently approximate once converted to cost")]
        let api_call_cost = api_calls as f64 * rates.api_call_unit_cost;

        let subtotal = agent_invocation_cost + token_cost + storage_cost + api_call_cost;
        let discount_amount = subtotal * (discount_percent / 100.0);
        let total_amount = subtotal - discount_amount;

        Self {
            id: generate_id(),
            tenant_id,
            period_start,
            period_end,
            agent_invocations,
            total_tokens,
            storage_gb,
            api_calls,
            agent_invocation_cost,
            token_cost,
            storage_cost,
            api_call_cost,
            discount_percent,
            subtotal,
            discount_amount,
            total_amount,
        }
    }
}
