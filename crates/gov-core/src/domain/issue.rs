// crates/gov-core/src/domain/issue.rs
// ============================================================================
// Module: Issue
// Description: Severity-indexed governance issues, their escalation ladder,
//              and the four-eyes resolution record.
// ============================================================================

//! ## Overview
//! An `Issue` tracks a governance finding from creation through resolution.
//! An issue may only reach `Resolved`/`Closed` with a
//! `Resolution` whose `verified_by` differs from `implemented_by` — the
//! four-eyes requirement enforced structurally by [`crate::GovernanceError`]
//! at the call site that constructs a `Resolution`.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::CdeId;
use crate::identifiers::IssueId;
use crate::identifiers::ReportId;
use crate::time::Timestamp;

/// Severity of a governance issue, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Cosmetic or informational.
    Low,
    /// Worth tracking but not urgent.
    Medium,
    /// Requires prompt attention.
    High,
    /// Blocks dependent workflow transitions until resolved.
    Critical,
}

/// Lifecycle status of an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Newly created; unassigned or untriaged.
    Open,
    /// Actively being worked.
    InProgress,
    /// A fix has been implemented and awaits four-eyes verification.
    PendingVerification,
    /// Verified as fixed.
    Resolved,
    /// Resolved and administratively closed.
    Closed,
}

impl IssueStatus {
    /// Returns `true` if this status counts toward the open-issue metrics
    /// (§4.E `metrics()` `openCount`/`openBySeverity`).
    #[must_use]
    pub fn counts_as_open(self) -> bool {
        matches!(self, Self::Open | Self::InProgress | Self::PendingVerification)
    }

    /// Returns `true` if this status participates in the critical-issue
    /// blocking predicate (G-critical-issue, §4.D/§4.E). Narrower than
    /// [`Self::counts_as_open`]: `PendingVerification` counts toward the
    /// open metrics but does not block, since a fix is already implemented
    /// and only awaiting four-eyes verification.
    #[must_use]
    pub fn is_actively_blocking(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

/// The four-eyes resolution record for a closed-out issue.
///
/// # Invariants
/// - `verified_by != implemented_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Category of fix applied, e.g. `"data_correction"`.
    pub resolution_type: String,
    /// Free-form description of the fix.
    pub description: String,
    /// Actor who implemented the fix.
    pub implemented_by: String,
    /// When the fix was implemented.
    pub implemented_at: Timestamp,
    /// Actor who independently verified the fix; must differ from `implemented_by`.
    pub verified_by: String,
    /// When the fix was verified.
    pub verified_at: Timestamp,
}

/// A governance issue raised against one or more reports and CDEs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier.
    pub id: IssueId,
    /// Short human-readable title.
    pub title: String,
    /// Severity classification.
    pub severity: Severity,
    /// Current lifecycle status.
    pub status: IssueStatus,
    /// Reports impacted by this issue.
    pub impacted_reports: BTreeSet<ReportId>,
    /// CDEs impacted by this issue.
    pub impacted_cdes: BTreeSet<CdeId>,
    /// Number of times this issue has been escalated.
    pub escalation_level: u64,
    /// When the issue was most recently escalated, if ever.
    pub escalated_at: Option<Timestamp>,
    /// Resolution record, present only once verified.
    pub resolution: Option<Resolution>,
    /// When the issue was created.
    pub created_at: Timestamp,
}

impl Issue {
    /// Returns `true` if this issue currently blocks operations against
    /// `report` under the G-critical-issue predicate: critical severity,
    /// an actively-blocking status (`open` or `in_progress`), and the
    /// report among those impacted.
    #[must_use]
    pub fn blocks(&self, report: &ReportId) -> bool {
        self.severity == Severity::Critical
            && self.status.is_actively_blocking()
            && self.impacted_reports.contains(report)
    }
}

/// Aggregate issue metrics (§4.E `metrics()`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueMetrics {
    /// Count of issues in an open-counting status.
    pub open_count: usize,
    /// Open count broken down by severity.
    pub open_by_severity: std::collections::BTreeMap<Severity, usize>,
    /// Mean resolution time in seconds across resolved/closed issues; `0` if none.
    pub avg_resolution_time_secs: f64,
}
