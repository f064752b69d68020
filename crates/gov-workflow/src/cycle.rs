// crates/gov-workflow/src/cycle.rs
// ============================================================================
// Module: Cycle Engine
// Description: Commands that drive a `CycleInstance` through its phases and
//              the human tasks attached to it (§4.D).
// ============================================================================

//! ## Overview
//! `CycleEngine` owns the full `startCycle` / `pauseCycle` / `resumeCycle` /
//! `advancePhase` / `triggerAgent` / `createHumanTask` / `completeHumanTask`
//! command surface. Every state-changing command appends an audit entry
//! before returning. G-critical-issue blocks `resumeCycle`, `triggerAgent`,
//! and `advancePhase` alike, so a critical issue against a
//! report halts all three ways a cycle could otherwise keep moving (see
//! `DESIGN.md`).

use std::collections::BTreeSet;
use std::sync::Arc;

use gov_audit::AuditStore;
use gov_core::Repository;
use gov_core::TenantContext;
use gov_core::Timestamp;
use gov_core::domain::audit::AuditEntry;
use gov_core::domain::cycle::Checkpoint;
use gov_core::domain::cycle::CycleInstance;
use gov_core::domain::cycle::CycleStatus;
use gov_core::domain::cycle::Phase;
use gov_core::domain::report::CatalogStatus;
use gov_core::domain::task::Decision;
use gov_core::domain::task::DecisionOutcome;
use gov_core::domain::task::HumanTask;
use gov_core::domain::task::HumanTaskType;
use gov_core::domain::task::TaskStatus;
use gov_core::identifiers::CycleId;
use gov_core::identifiers::HumanTaskId;
use gov_core::identifiers::ReportId;
use gov_core::repository::CycleFilter;
use serde_json::json;

use crate::agent::AgentType;
use crate::error::WorkflowError;
use crate::gates;

/// Minimum length, in characters, a human task's completion rationale must
/// meet before `completeHumanTask` accepts it (§4.D).
const MIN_RATIONALE_LEN: usize = 20;

/// Roles required to approve each phase's checkpoint, in phase order.
fn default_required_roles(phase: Phase) -> BTreeSet<String> {
    let roles: &[&str] = match phase {
        Phase::DataGathering => &["data_owner"],
        Phase::Validation => &["data_quality_analyst"],
        Phase::Review => &["reviewer"],
        Phase::Approval => &["approver"],
        Phase::Submission => &["submitter"],
    };
    roles.iter().map(|role| (*role).to_string()).collect()
}

/// Coordinates cycle and human-task lifecycle commands.
pub struct CycleEngine {
    repository: Arc<dyn Repository>,
    audit: Arc<AuditStore>,
}

impl CycleEngine {
    /// Builds an engine over `repository` and `audit`.
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>, audit: Arc<AuditStore>) -> Self {
        Self { repository, audit }
    }

    /// Starts a new cycle for `report_id` covering the period ending
    /// `period_end`, requiring the tenant's catalog to be `approved` and
    /// `report_id` to be registered in it.
    ///
    /// # Errors
    /// Returns [`WorkflowError::NotFound`] if the report is unknown, or
    /// [`WorkflowError::InvalidState`] if the catalog is not approved.
    pub fn start_cycle(&self, ctx: &TenantContext, report_id: &ReportId, period_end: Timestamp) -> Result<CycleInstance, WorkflowError> {
        let catalog = self.repository.get_catalog(&ctx.tenant_id).ok_or_else(|| WorkflowError::InvalidState("no catalog registered for tenant".to_string()))?;
        if catalog.status != CatalogStatus::Approved {
            return Err(WorkflowError::InvalidState("catalog must be approved before a cycle can start".to_string()));
        }
        self.repository
            .get_report(&ctx.tenant_id, report_id)
            .ok_or_else(|| WorkflowError::NotFound {
                entity_type: "report",
                entity_id: report_id.to_string(),
            })?;

        let checkpoints = Phase::all().into_iter().map(|phase| Checkpoint::new(phase, default_required_roles(phase))).collect();
        let cycle = CycleInstance {
            id: CycleId::generate(),
            report_id: report_id.clone(),
            period_end,
            status: CycleStatus::Active,
            current_phase: Phase::DataGathering,
            checkpoints,
            started_at: Timestamp::now(),
            pause_reason: None,
        };
        self.repository.create_cycle(&ctx.tenant_id, cycle.clone()).map_err(|_| WorkflowError::InvariantViolation("cycle id collision".to_string()))?;

        self.append(ctx, "start_cycle", "cycle", cycle.id.to_string(), None, Some(json!({ "report_id": report_id, "phase": cycle.current_phase })))?;
        Ok(cycle)
    }

    /// Pauses `cycle_id`, recording `reason`. Only valid from `Active`.
    ///
    /// # Errors
    /// Returns [`WorkflowError::NotFound`] if the cycle does not exist, or
    /// [`WorkflowError::InvalidState`] if it is not currently active.
    pub fn pause_cycle(&self, ctx: &TenantContext, cycle_id: &CycleId, reason: &str) -> Result<CycleInstance, WorkflowError> {
        let mut cycle = self.require_cycle(ctx, cycle_id)?;
        if cycle.status != CycleStatus::Active {
            return Err(WorkflowError::InvalidState(format!("cannot pause cycle in {:?} status", cycle.status)));
        }
        cycle.status = CycleStatus::Paused;
        cycle.pause_reason = Some(reason.to_string());
        self.repository.update_cycle(&ctx.tenant_id, cycle.clone());

        self.append(ctx, "pause_cycle", "cycle", cycle_id.to_string(), None, Some(json!({ "reason": reason })))?;
        Ok(cycle)
    }

    /// Resumes `cycle_id` from `Paused`, gated by G-critical-issue.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidState`] if the cycle is not paused, or
    /// [`WorkflowError::BlockedByCriticalIssue`] if an open critical issue
    /// impacts the cycle's report.
    pub fn resume_cycle(&self, ctx: &TenantContext, cycle_id: &CycleId, rationale: &str) -> Result<CycleInstance, WorkflowError> {
        let mut cycle = self.require_cycle(ctx, cycle_id)?;
        if cycle.status != CycleStatus::Paused {
            return Err(WorkflowError::InvalidState(format!("cannot resume cycle in {:?} status", cycle.status)));
        }
        self.ensure_not_blocked(ctx, &cycle.report_id)?;

        cycle.status = CycleStatus::Active;
        cycle.pause_reason = None;
        self.repository.update_cycle(&ctx.tenant_id, cycle.clone());

        self.append(ctx, "resume_cycle", "cycle", cycle_id.to_string(), None, Some(json!({ "rationale": rationale })))?;
        Ok(cycle)
    }

    /// Advances `cycle_id` to the next phase, requiring the current phase's
    /// checkpoint to be satisfied and no blocking critical issue to exist.
    /// Advancing past the last phase moves the cycle to `Completed`, which
    /// additionally requires G-attestation.
    ///
    /// # Errors
    /// Returns [`WorkflowError::CheckpointIncomplete`],
    /// [`WorkflowError::BlockedByCriticalIssue`], or
    /// [`WorkflowError::InvariantViolation`] if G-attestation is unsatisfied.
    pub fn advance_phase(&self, ctx: &TenantContext, cycle_id: &CycleId, rationale: &str) -> Result<CycleInstance, WorkflowError> {
        let mut cycle = self.require_cycle(ctx, cycle_id)?;
        if cycle.status != CycleStatus::Active {
            return Err(WorkflowError::InvalidState(format!("cannot advance cycle in {:?} status", cycle.status)));
        }
        self.ensure_not_blocked(ctx, &cycle.report_id)?;

        let checkpoint = cycle.current_checkpoint().ok_or_else(|| WorkflowError::InvariantViolation("current phase has no checkpoint".to_string()))?;
        if !checkpoint.is_satisfied() {
            return Err(WorkflowError::CheckpointIncomplete {
                completed: checkpoint.completed_approvals.len(),
                required: checkpoint.required_approvals.len(),
            });
        }

        match cycle.current_phase.next() {
            Some(next_phase) => {
                cycle.current_phase = next_phase;
            }
            None => {
                if !gates::attestation_satisfied(self.repository.as_ref(), ctx, cycle_id) {
                    return Err(WorkflowError::InvariantViolation("completion requires an approved attestation task".to_string()));
                }
                cycle.status = CycleStatus::Completed;
            }
        }
        self.repository.update_cycle(&ctx.tenant_id, cycle.clone());

        self.append(
            ctx,
            "advance_phase",
            "cycle",
            cycle_id.to_string(),
            None,
            Some(json!({ "phase": cycle.current_phase, "status": cycle.status, "rationale": rationale })),
        )?;
        Ok(cycle)
    }

    /// Dispatches `agent_type` against `cycle_id`, gated by its phase
    /// prerequisite and G-critical-issue. Dispatch itself is out of scope
    /// (§1); this only records that dispatch was authorized.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidState`] if the prerequisite is unmet,
    /// or [`WorkflowError::BlockedByCriticalIssue`] if blocked.
    pub fn trigger_agent(&self, ctx: &TenantContext, cycle_id: &CycleId, agent_type: AgentType) -> Result<(), WorkflowError> {
        let cycle = self.require_cycle(ctx, cycle_id)?;
        self.ensure_not_blocked(ctx, &cycle.report_id)?;
        if !agent_type.prerequisite_met(&cycle) {
            return Err(WorkflowError::InvalidState(format!("{agent_type:?} prerequisite not met at phase {:?}", cycle.current_phase)));
        }

        self.append(ctx, "trigger_agent", "cycle", cycle_id.to_string(), None, Some(json!({ "agent_type": agent_type })))?;
        Ok(())
    }

    /// Creates a human task attached to `cycle_id`.
    ///
    /// # Errors
    /// Returns [`WorkflowError::NotFound`] if the cycle does not exist.
    pub fn create_human_task(
        &self,
        ctx: &TenantContext,
        cycle_id: &CycleId,
        task_type: HumanTaskType,
        title: &str,
        assigned_to: &str,
        assigned_role: &str,
        due_date: Timestamp,
    ) -> Result<HumanTask, WorkflowError> {
        self.require_cycle(ctx, cycle_id)?;

        let task = HumanTask {
            id: HumanTaskId::generate(),
            cycle_id: cycle_id.clone(),
            task_type,
            title: title.to_string(),
            assigned_to: assigned_to.to_string(),
            assigned_role: assigned_role.to_string(),
            due_date,
            status: TaskStatus::Pending,
            decision: None,
        };
        self.repository
            .create_human_task(&ctx.tenant_id, task.clone())
            .map_err(|_| WorkflowError::InvariantViolation("human task id collision".to_string()))?;

        self.append(ctx, "create_human_task", "human_task", task.id.to_string(), None, Some(json!({ "task_type": task.task_type, "assigned_to": assigned_to })))?;
        Ok(task)
    }

    /// Completes `task_id` with `outcome`, requiring `rationale` to be at
    /// least [`MIN_RATIONALE_LEN`] characters. An `approved` outcome feeds
    /// the decision into the owning cycle's matching-role checkpoint.
    ///
    /// # Errors
    /// Returns [`WorkflowError::NotFound`] if the task does not exist, or
    /// [`WorkflowError::InvariantViolation`] if `rationale` is too short.
    pub fn complete_human_task(
        &self,
        ctx: &TenantContext,
        task_id: &HumanTaskId,
        outcome: DecisionOutcome,
        rationale: &str,
        completed_by: &str,
    ) -> Result<HumanTask, WorkflowError> {
        if rationale.chars().count() < MIN_RATIONALE_LEN {
            return Err(WorkflowError::InvariantViolation(format!(
                "completion rationale must be at least {MIN_RATIONALE_LEN} characters"
            )));
        }

        let mut task = self
            .repository
            .get_human_task(&ctx.tenant_id, task_id)
            .ok_or_else(|| WorkflowError::NotFound {
                entity_type: "human_task",
                entity_id: task_id.to_string(),
            })?;

        task.status = TaskStatus::Completed;
        task.decision = Some(Decision {
            outcome,
            rationale: rationale.to_string(),
            completed_by: completed_by.to_string(),
            completed_at: Timestamp::now(),
        });
        self.repository.update_human_task(&ctx.tenant_id, task.clone());

        if outcome.counts_as_approval() {
            if let Some(mut cycle) = self.repository.get_cycle(&ctx.tenant_id, &task.cycle_id) {
                if let Some(checkpoint) = cycle.checkpoint_for_mut(cycle.current_phase) {
                    if checkpoint.required_approvals.contains(&task.assigned_role) {
                        checkpoint.record_approval(task.assigned_role.clone());
                        self.repository.update_cycle(&ctx.tenant_id, cycle);
                    }
                }
            }
        }

        self.append(
            ctx,
            "complete_human_task",
            "human_task",
            task_id.to_string(),
            None,
            Some(json!({ "outcome": outcome, "completed_by": completed_by })),
        )?;
        Ok(task)
    }

    /// Lists cycles for `report_id`, most-recently-started last.
    #[must_use]
    pub fn list_cycles_for_report(&self, ctx: &TenantContext, report_id: &ReportId) -> Vec<CycleInstance> {
        self.repository.list_cycles(
            &ctx.tenant_id,
            &CycleFilter {
                report_id: Some(report_id.clone()),
            },
        )
    }

    /// Fetches `cycle_id` or returns [`WorkflowError::NotFound`].
    fn require_cycle(&self, ctx: &TenantContext, cycle_id: &CycleId) -> Result<CycleInstance, WorkflowError> {
        self.repository.get_cycle(&ctx.tenant_id, cycle_id).ok_or_else(|| WorkflowError::NotFound {
            entity_type: "cycle",
            entity_id: cycle_id.to_string(),
        })
    }

    /// Returns [`WorkflowError::BlockedByCriticalIssue`] if an open critical
    /// issue impacts `report_id` (G-critical-issue).
    fn ensure_not_blocked(&self, ctx: &TenantContext, report_id: &ReportId) -> Result<(), WorkflowError> {
        let blocking = gates::blocking_critical_issues(self.repository.as_ref(), ctx, report_id);
        if blocking.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::BlockedByCriticalIssue { count: blocking.len() })
        }
    }

    /// Appends an audit entry for a cycle/task-family command.
    fn append(
        &self,
        ctx: &TenantContext,
        action: &str,
        entity_type: &str,
        entity_id: String,
        previous_state: Option<serde_json::Value>,
        new_state: Option<serde_json::Value>,
    ) -> Result<(), WorkflowError> {
        let chain = self.audit.chain_for(&ctx.tenant_id);
        let mut entry = AuditEntry::new(&ctx.actor, ctx.actor_type, action, entity_type, entity_id).with_tenant(ctx.tenant_id.clone());
        if let Some(previous) = previous_state {
            entry = entry.with_previous_state(previous);
        }
        if let Some(new) = new_state {
            entry = entry.with_new_state(new);
        }
        chain.append(entry).map_err(WorkflowError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CycleEngine;
    use gov_audit::AuditStore;
    use gov_core::ActorType;
    use gov_core::InMemoryRepository;
    use gov_core::Repository;
    use gov_core::TenantContext;
    use gov_core::domain::issue::Issue;
    use gov_core::domain::issue::IssueStatus;
    use gov_core::domain::issue::Severity;
    use gov_core::domain::report::CatalogStatus;
    use gov_core::domain::report::Jurisdiction;
    use gov_core::domain::report::RegulatoryReport;
    use gov_core::domain::report::ReportCatalog;
    use gov_core::domain::task::DecisionOutcome;
    use gov_core::domain::task::HumanTaskType;
    use gov_core::identifiers::IssueId;
    use gov_core::identifiers::ReportId;
    use gov_core::identifiers::SessionId;
    use gov_core::identifiers::TenantId;
    use gov_core::time::Timestamp;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn ctx() -> TenantContext {
        TenantContext::new(TenantId::new("t1"), SessionId::generate(), "alice", ActorType::Human)
    }

    fn engine_with_approved_catalog(report_id: &ReportId) -> (CycleEngine, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        repo.put_report(
            &ctx().tenant_id,
            RegulatoryReport {
                id: report_id.clone(),
                name: "sample report".to_string(),
                jurisdiction: Jurisdiction::Us,
                regulator: "FED".to_string(),
                frequency: "quarterly".to_string(),
                due_date_rule: "30 days after period end".to_string(),
                responsible_unit: "risk".to_string(),
                last_updated: Timestamp::now(),
            },
        );
        repo.put_catalog(
            &ctx().tenant_id,
            ReportCatalog {
                version: 1,
                status: CatalogStatus::Approved,
                reports: vec![],
                approved_by: Some("bob".to_string()),
                approved_at: Some(Timestamp::now()),
            },
        );
        let engine = CycleEngine::new(repo.clone(), Arc::new(AuditStore::new()));
        (engine, repo)
    }

    #[test]
    fn start_cycle_requires_approved_catalog() {
        let repo = Arc::new(InMemoryRepository::new());
        let engine = CycleEngine::new(repo, Arc::new(AuditStore::new()));
        let result = engine.start_cycle(&ctx(), &ReportId::new("r1"), Timestamp::now());
        assert!(result.is_err());
    }

    #[test]
    fn start_cycle_succeeds_against_approved_catalog_and_registered_report() {
        let report_id = ReportId::new("r1");
        let (engine, _repo) = engine_with_approved_catalog(&report_id);
        let cycle = engine.start_cycle(&ctx(), &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(cycle.checkpoints.len(), 5);
    }

    #[test]
    fn advance_phase_fails_until_checkpoint_satisfied() {
        let report_id = ReportId::new("r1");
        let (engine, _repo) = engine_with_approved_catalog(&report_id);
        let cycle = engine.start_cycle(&ctx(), &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));
        let result = engine.advance_phase(&ctx(), &cycle.id, "trying to advance early");
        assert!(result.is_err());
    }

    #[test]
    fn advance_phase_succeeds_once_every_approval_is_completed_via_human_tasks() {
        let report_id = ReportId::new("r1");
        let (engine, _repo) = engine_with_approved_catalog(&report_id);
        let cycle = engine.start_cycle(&ctx(), &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));

        let task = engine
            .create_human_task(&ctx(), &cycle.id, HumanTaskType::Approval, "sign off data gathering", "carol", "data_owner", Timestamp::now())
            .unwrap_or_else(|err| panic!("{err}"));
        engine
            .complete_human_task(&ctx(), &task.id, DecisionOutcome::Approved, "data is complete and matches source systems", "carol")
            .unwrap_or_else(|err| panic!("{err}"));

        let advanced = engine.advance_phase(&ctx(), &cycle.id, "data gathering checkpoint satisfied").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(advanced.current_phase, gov_core::domain::cycle::Phase::Validation);
    }

    #[test]
    fn resume_cycle_blocked_by_open_critical_issue_against_its_report() {
        let report_id = ReportId::new("r1");
        let (engine, repo) = engine_with_approved_catalog(&report_id);
        let cycle = engine.start_cycle(&ctx(), &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));
        engine.pause_cycle(&ctx(), &cycle.id, "investigating a data issue").unwrap_or_else(|err| panic!("{err}"));

        repo.create_issue(
            &ctx().tenant_id,
            Issue {
                id: IssueId::new("i1"),
                title: "bad data".to_string(),
                severity: Severity::Critical,
                status: IssueStatus::Open,
                impacted_reports: BTreeSet::from([report_id.clone()]),
                impacted_cdes: BTreeSet::new(),
                escalation_level: 0,
                escalated_at: None,
                resolution: None,
                created_at: Timestamp::now(),
            },
        )
        .unwrap_or_else(|err| panic!("{err}"));

        let result = engine.resume_cycle(&ctx(), &cycle.id, "ready to continue");
        assert!(matches!(result, Err(super::WorkflowError::BlockedByCriticalIssue { count: 1 })));
    }

    #[test]
    fn pause_cycle_rejected_when_not_active() {
        let report_id = ReportId::new("r1");
        let (engine, _repo) = engine_with_approved_catalog(&report_id);
        let cycle = engine.start_cycle(&ctx(), &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));
        engine.pause_cycle(&ctx(), &cycle.id, "first pause").unwrap_or_else(|err| panic!("{err}"));
        let result = engine.pause_cycle(&ctx(), &cycle.id, "second pause");
        assert!(result.is_err());
    }

    #[test]
    fn complete_human_task_rejects_short_rationale() {
        let report_id = ReportId::new("r1");
        let (engine, _repo) = engine_with_approved_catalog(&report_id);
        let cycle = engine.start_cycle(&ctx(), &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));
        let task = engine
            .create_human_task(&ctx(), &cycle.id, HumanTaskType::Approval, "sign off", "carol", "data_owner", Timestamp::now())
            .unwrap_or_else(|err| panic!("{err}"));
        let result = engine.complete_human_task(&ctx(), &task.id, DecisionOutcome::Approved, "too short", "carol");
        assert!(result.is_err());
    }
}
