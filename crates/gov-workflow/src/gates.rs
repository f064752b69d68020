// crates/gov-workflow/src/gates.rs
// ============================================================================
// Module: Workflow Gates
// Description: Predicates evaluated before a terminal or blocking transition.
// ============================================================================

//! ## Overview
//! G-critical-issue blocks `resumeCycle`, `triggerAgent`, and `advancePhase`
//! uniformly across every `active`-state transition, making critical-issue
//! blocking a cycle-wide guarantee rather than a command-specific one.
//! G-attestation gates the terminal `submission -> completed` transition.

use gov_core::Repository;
use gov_core::TenantContext;
use gov_core::domain::issue::Issue;
use gov_core::domain::task::HumanTask;
use gov_core::domain::task::HumanTaskType;
use gov_core::identifiers::CycleId;
use gov_core::identifiers::ReportId;
use gov_core::repository::IssueFilter;

/// Returns the open critical issues that block operations against `report`
/// (G-critical-issue): `severity = critical`, an open-counting status, and
/// `report` among `impacted_reports`.
#[must_use]
pub fn blocking_critical_issues(repository: &dyn Repository, ctx: &TenantContext, report: &ReportId) -> Vec<Issue> {
    repository
        .list_issues(&ctx.tenant_id, &IssueFilter::default())
        .into_iter()
        .filter(|issue| issue.blocks(report))
        .collect()
}

/// Returns `true` if there exists a completed, approved `attestation` human
/// task on `cycle` (G-attestation).
#[must_use]
pub fn attestation_satisfied(repository: &dyn Repository, ctx: &TenantContext, cycle: &CycleId) -> bool {
    repository.list_human_tasks_for_cycle(&ctx.tenant_id, cycle).iter().any(is_approved_attestation)
}

/// Returns `true` if `task` is a completed, approved attestation.
fn is_approved_attestation(task: &HumanTask) -> bool {
    task.task_type == HumanTaskType::Attestation && task.is_approving_decision()
}
