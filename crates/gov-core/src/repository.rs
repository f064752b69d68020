// crates/gov-core/src/repository.rs
// ============================================================================
// Module: Repository
// Description: Abstract CRUD + query surface for every governance entity
//              family, plus an in-memory reference implementation.
// ============================================================================

//! ## Overview
//! `Repository` is the single storage seam every subsystem mutates state
//! through (§4.B). All returned values are independent copies — mutating a
//! returned value never affects storage — the Rust-idiomatic equivalent of
//! the Python reference's `deepcopy`-on-return discipline (§9).
//!
//! `not_found` is represented as `None`/empty, never as an error; only
//! genuinely invalid commands (duplicate ids on entities documented as
//! rejecting them) return `Err`.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;

use crate::domain::cde::CriticalDataElement;
use crate::domain::cycle::CycleInstance;
use crate::domain::dq::DqRule;
use crate::domain::dq::RuleExecutionResult;
use crate::domain::issue::Issue;
use crate::domain::issue::IssueStatus;
use crate::domain::issue::Severity;
use crate::domain::report::RegulatoryReport;
use crate::domain::report::ReportCatalog;
use crate::domain::task::HumanTask;
use crate::error::GovernanceError;
use crate::identifiers::CdeId;
use crate::identifiers::CycleId;
use crate::identifiers::DqRuleId;
use crate::identifiers::HumanTaskId;
use crate::identifiers::IssueId;
use crate::identifiers::ReportId;
use crate::identifiers::TenantId;
use crate::time::Timestamp;

/// Conjunctive filter over [`Issue`] listings; unset fields match any value.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Restrict to this severity.
    pub severity: Option<Severity>,
    /// Restrict to this status.
    pub status: Option<IssueStatus>,
    /// Restrict to issues impacting this report.
    pub impacted_report: Option<ReportId>,
    /// Restrict to issues impacting this CDE.
    pub impacted_cde: Option<CdeId>,
}

impl IssueFilter {
    /// Returns `true` if `issue` satisfies every set field of this filter.
    #[must_use]
    fn matches(&self, issue: &Issue) -> bool {
        self.severity.is_none_or(|s| issue.severity == s)
            && self.status.is_none_or(|s| issue.status == s)
            && self
                .impacted_report
                .as_ref()
                .is_none_or(|r| issue.impacted_reports.contains(r))
            && self.impacted_cde.as_ref().is_none_or(|c| issue.impacted_cdes.contains(c))
    }
}

/// Conjunctive filter over [`CycleInstance`] listings; unset fields match any value.
#[derive(Debug, Clone, Default)]
pub struct CycleFilter {
    /// Restrict to cycles for this report.
    pub report_id: Option<ReportId>,
}

/// Conjunctive filter over [`RuleExecutionResult`] listings by time range.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResultFilter {
    /// Only results executed at or after this time.
    pub since: Option<Timestamp>,
    /// Only results executed at or before this time.
    pub until: Option<Timestamp>,
}

impl ExecutionResultFilter {
    #[must_use]
    fn matches(&self, result: &RuleExecutionResult) -> bool {
        self.since.is_none_or(|since| result.executed_at >= since)
            && self.until.is_none_or(|until| result.executed_at <= until)
    }
}

/// Abstract storage for every governance entity family.
///
/// Implementations must be safe to call concurrently from multiple worker
/// threads; each individual operation is atomic but no cross-family
/// transaction is provided (§4.B / §5).
pub trait Repository: Send + Sync {
    // -- Report catalog ----------------------------------------------------

    /// Returns the singleton catalog for `tenant`, or `None` if never created.
    fn get_catalog(&self, tenant: &TenantId) -> Option<ReportCatalog>;

    /// Replaces the singleton catalog for `tenant`.
    fn put_catalog(&self, tenant: &TenantId, catalog: ReportCatalog);

    // -- Regulatory reports --------------------------------------------------

    /// Creates or overwrites a report definition (idempotent on id collision).
    fn put_report(&self, tenant: &TenantId, report: RegulatoryReport);

    /// Returns a report by id.
    fn get_report(&self, tenant: &TenantId, id: &ReportId) -> Option<RegulatoryReport>;

    /// Lists every report registered for `tenant`.
    fn list_reports(&self, tenant: &TenantId) -> Vec<RegulatoryReport>;

    // -- Cycles --------------------------------------------------------------

    /// Creates a new cycle.
    ///
    /// # Errors
    /// Returns [`GovernanceError::InvalidState`] if `cycle.id` already exists.
    fn create_cycle(&self, tenant: &TenantId, cycle: CycleInstance) -> Result<(), GovernanceError>;

    /// Returns a cycle by id.
    fn get_cycle(&self, tenant: &TenantId, id: &CycleId) -> Option<CycleInstance>;

    /// Overwrites an existing cycle. Returns `false` if it did not already exist.
    fn update_cycle(&self, tenant: &TenantId, cycle: CycleInstance) -> bool;

    /// Lists cycles for `tenant` matching `filter`.
    fn list_cycles(&self, tenant: &TenantId, filter: &CycleFilter) -> Vec<CycleInstance>;

    // -- Human tasks -----------------------------------------------------------

    /// Creates a new human task.
    ///
    /// # Errors
    /// Returns [`GovernanceError::InvalidState`] if `task.id` already exists.
    fn create_human_task(&self, tenant: &TenantId, task: HumanTask) -> Result<(), GovernanceError>;

    /// Returns a human task by id.
    fn get_human_task(&self, tenant: &TenantId, id: &HumanTaskId) -> Option<HumanTask>;

    /// Overwrites an existing human task. Returns `false` if it did not already exist.
    fn update_human_task(&self, tenant: &TenantId, task: HumanTask) -> bool;

    /// Lists every human task attached to `cycle`.
    fn list_human_tasks_for_cycle(&self, tenant: &TenantId, cycle: &CycleId) -> Vec<HumanTask>;

    // -- Issues ------------------------------------------------------------

    /// Creates a new issue.
    ///
    /// # Errors
    /// Returns [`GovernanceError::InvalidState`] if `issue.id` already exists.
    fn create_issue(&self, tenant: &TenantId, issue: Issue) -> Result<(), GovernanceError>;

    /// Returns an issue by id.
    fn get_issue(&self, tenant: &TenantId, id: &IssueId) -> Option<Issue>;

    /// Overwrites an existing issue. Returns `false` if it did not already exist.
    fn update_issue(&self, tenant: &TenantId, issue: Issue) -> bool;

    /// Removes an issue, returning `true` if it existed.
    fn delete_issue(&self, tenant: &TenantId, id: &IssueId) -> bool;

    /// Lists issues for `tenant` matching `filter` (fields combine conjunctively).
    fn list_issues(&self, tenant: &TenantId, filter: &IssueFilter) -> Vec<Issue>;

    // -- Critical data elements ----------------------------------------------

    /// Creates or overwrites a critical data element entry.
    fn put_cde(&self, tenant: &TenantId, cde: CriticalDataElement);

    /// Returns a critical data element by id.
    fn get_cde(&self, tenant: &TenantId, id: &CdeId) -> Option<CriticalDataElement>;

    /// Lists every critical data element registered for `tenant`.
    fn list_cdes(&self, tenant: &TenantId) -> Vec<CriticalDataElement>;

    // -- DQ rules --------------------------------------------------------------

    /// Creates or overwrites a DQ rule.
    fn put_dq_rule(&self, tenant: &TenantId, rule: DqRule);

    /// Returns a DQ rule by id.
    fn get_dq_rule(&self, tenant: &TenantId, id: &DqRuleId) -> Option<DqRule>;

    /// Removes a DQ rule, returning `true` if it existed.
    fn delete_dq_rule(&self, tenant: &TenantId, id: &DqRuleId) -> bool;

    /// Lists DQ rules for `tenant`, optionally restricted to one CDE.
    fn list_dq_rules(&self, tenant: &TenantId, cde_id: Option<&CdeId>) -> Vec<DqRule>;

    // -- Rule execution history --------------------------------------------------

    /// Records the outcome of evaluating a DQ rule.
    fn record_rule_execution(&self, tenant: &TenantId, result: RuleExecutionResult);

    /// Returns execution history for `rule_id` matching `filter`, most-recent first.
    fn get_rule_execution_results(
        &self,
        tenant: &TenantId,
        rule_id: &DqRuleId,
        filter: &ExecutionResultFilter,
    ) -> Vec<RuleExecutionResult>;
}

/// Per-tenant storage backing [`InMemoryRepository`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct TenantState {
    catalog: Option<ReportCatalog>,
    reports: HashMap<ReportId, RegulatoryReport>,
    cycles: HashMap<CycleId, CycleInstance>,
    human_tasks: HashMap<HumanTaskId, HumanTask>,
    issues: HashMap<IssueId, Issue>,
    cdes: HashMap<CdeId, CriticalDataElement>,
    dq_rules: HashMap<DqRuleId, DqRule>,
    rule_executions: Vec<RuleExecutionResult>,
}

/// The in-memory reference [`Repository`] implementation.
///
/// Suitable for tests and single-process deployments; durable/SQL-backed
/// storage is out of scope for this core (§1 Non-goals).
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tenants: Mutex<HashMap<TenantId, TenantState>>,
}

impl InMemoryRepository {
    /// Builds an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the state for `tenant`, creating it on first access.
    fn with_tenant<R>(&self, tenant: &TenantId, f: impl FnOnce(&mut TenantState) -> R) -> R {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut tenants = self.tenants.lock().unwrap();
        let state = tenants.entry(tenant.clone()).or_default();
        f(state)
    }

    /// Captures the full repository state as an opaque, serializable
    /// [`RepositorySnapshot`] (e.g. for a `gov-cli` session file, §6
    /// "Persisted state layout"). No format is mandated beyond round-tripping
    /// through [`InMemoryRepository::from_snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> RepositorySnapshot {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let tenants = self.tenants.lock().unwrap();
        RepositorySnapshot(tenants.clone())
    }

    /// Rebuilds a repository from a previously-captured [`RepositorySnapshot`].
    #[must_use]
    pub fn from_snapshot(snapshot: RepositorySnapshot) -> Self {
        Self {
            tenants: Mutex::new(snapshot.0),
        }
    }
}

/// An opaque, serializable capture of an [`InMemoryRepository`]'s complete
/// state across every tenant. The in-memory repository is otherwise
/// deliberately non-durable (§1 Non-goals); this is the seam a caller
/// persists across process restarts through, not a documented storage
/// format other tooling should parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySnapshot(HashMap<TenantId, TenantState>);

impl Repository for InMemoryRepository {
    fn get_catalog(&self, tenant: &TenantId) -> Option<ReportCatalog> {
        self.with_tenant(tenant, |state| state.catalog.clone())
    }

    fn put_catalog(&self, tenant: &TenantId, catalog: ReportCatalog) {
        self.with_tenant(tenant, |state| state.catalog = Some(catalog));
    }

    fn put_report(&self, tenant: &TenantId, report: RegulatoryReport) {
        self.with_tenant(tenant, |state| {
            state.reports.insert(report.id.clone(), report);
        });
    }

    fn get_report(&self, tenant: &TenantId, id: &ReportId) -> Option<RegulatoryReport> {
        self.with_tenant(tenant, |state| state.reports.get(id).cloned())
    }

    fn list_reports(&self, tenant: &TenantId) -> Vec<RegulatoryReport> {
        self.with_tenant(tenant, |state| state.reports.values().cloned().collect())
    }

    fn create_cycle(&self, tenant: &TenantId, cycle: CycleInstance) -> Result<(), GovernanceError> {
        self.with_tenant(tenant, |state| {
            if state.cycles.contains_key(&cycle.id) {
                return Err(GovernanceError::invalid_state(format!(
                    "cycle {} already exists",
                    cycle.id
                )));
            }
            state.cycles.insert(cycle.id.clone(), cycle);
            Ok(())
        })
    }

    fn get_cycle(&self, tenant: &TenantId, id: &CycleId) -> Option<CycleInstance> {
        self.with_tenant(tenant, |state| state.cycles.get(id).cloned())
    }

    fn update_cycle(&self, tenant: &TenantId, cycle: CycleInstance) -> bool {
        self.with_tenant(tenant, |state| {
            if state.cycles.contains_key(&cycle.id) {
                state.cycles.insert(cycle.id.clone(), cycle);
                true
            } else {
                false
            }
        })
    }

    fn list_cycles(&self, tenant: &TenantId, filter: &CycleFilter) -> Vec<CycleInstance> {
        self.with_tenant(tenant, |state| {
            state
                .cycles
                .values()
                .filter(|cycle| filter.report_id.as_ref().is_none_or(|r| &cycle.report_id == r))
                .cloned()
                .collect()
        })
    }

    fn create_human_task(&self, tenant: &TenantId, task: HumanTask) -> Result<(), GovernanceError> {
        self.with_tenant(tenant, |state| {
            if state.human_tasks.contains_key(&task.id) {
                return Err(GovernanceError::invalid_state(format!("task {} already exists", task.id)));
            }
            state.human_tasks.insert(task.id.clone(), task);
            Ok(())
        })
    }

    fn get_human_task(&self, tenant: &TenantId, id: &HumanTaskId) -> Option<HumanTask> {
        self.with_tenant(tenant, |state| state.human_tasks.get(id).cloned())
    }

    fn update_human_task(&self, tenant: &TenantId, task: HumanTask) -> bool {
        self.with_tenant(tenant, |state| {
            if state.human_tasks.contains_key(&task.id) {
                state.human_tasks.insert(task.id.clone(), task);
                true
            } else {
                false
            }
        })
    }

    fn list_human_tasks_for_cycle(&self, tenant: &TenantId, cycle: &CycleId) -> Vec<HumanTask> {
        self.with_tenant(tenant, |state| {
            state.human_tasks.values().filter(|task| &task.cycle_id == cycle).cloned().collect()
        })
    }

    fn create_issue(&self, tenant: &TenantId, issue: Issue) -> Result<(), GovernanceError> {
        self.with_tenant(tenant, |state| {
            if state.issues.contains_key(&issue.id) {
                return Err(GovernanceError::invalid_state(format!("issue {} already exists", issue.id)));
            }
            state.issues.insert(issue.id.clone(), issue);
            Ok(())
        })
    }

    fn get_issue(&self, tenant: &TenantId, id: &IssueId) -> Option<Issue> {
        self.with_tenant(tenant, |state| state.issues.get(id).cloned())
    }

    fn update_issue(&self, tenant: &TenantId, issue: Issue) -> bool {
        self.with_tenant(tenant, |state| {
            if state.issues.contains_key(&issue.id) {
                state.issues.insert(issue.id.clone(), issue);
                true
            } else {
                false
            }
        })
    }

    fn delete_issue(&self, tenant: &TenantId, id: &IssueId) -> bool {
        self.with_tenant(tenant, |state| state.issues.remove(id).is_some())
    }

    fn list_issues(&self, tenant: &TenantId, filter: &IssueFilter) -> Vec<Issue> {
        self.with_tenant(tenant, |state| {
            state.issues.values().filter(|issue| filter.matches(issue)).cloned().collect()
        })
    }

    fn put_cde(&self, tenant: &TenantId, cde: CriticalDataElement) {
        self.with_tenant(tenant, |state| {
            state.cdes.insert(cde.score.id.clone(), cde);
        });
    }

    fn get_cde(&self, tenant: &TenantId, id: &CdeId) -> Option<CriticalDataElement> {
        self.with_tenant(tenant, |state| state.cdes.get(id).cloned())
    }

    fn list_cdes(&self, tenant: &TenantId) -> Vec<CriticalDataElement> {
        self.with_tenant(tenant, |state| state.cdes.values().cloned().collect())
    }

    fn put_dq_rule(&self, tenant: &TenantId, rule: DqRule) {
        self.with_tenant(tenant, |state| {
            state.dq_rules.insert(rule.id.clone(), rule);
        });
    }

    fn get_dq_rule(&self, tenant: &TenantId, id: &DqRuleId) -> Option<DqRule> {
        self.with_tenant(tenant, |state| state.dq_rules.get(id).cloned())
    }

    fn delete_dq_rule(&self, tenant: &TenantId, id: &DqRuleId) -> bool {
        self.with_tenant(tenant, |state| state.dq_rules.remove(id).is_some())
    }

    fn list_dq_rules(&self, tenant: &TenantId, cde_id: Option<&CdeId>) -> Vec<DqRule> {
        self.with_tenant(tenant, |state| {
            state
                .dq_rules
                .values()
                .filter(|rule| cde_id.is_none_or(|id| &rule.cde_id == id))
                .cloned()
                .collect()
        })
    }

    fn record_rule_execution(&self, tenant: &TenantId, result: RuleExecutionResult) {
        self.with_tenant(tenant, |state| state.rule_executions.push(result));
    }

    fn get_rule_execution_results(
        &self,
        tenant: &TenantId,
        rule_id: &DqRuleId,
        filter: &ExecutionResultFilter,
    ) -> Vec<RuleExecutionResult> {
        self.with_tenant(tenant, |state| {
            let mut results: Vec<RuleExecutionResult> = state
                .rule_executions
                .iter()
                .filter(|result| &result.rule_id == rule_id && filter.matches(result))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
            results
        })
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryRepository;
    use super::IssueFilter;
    use super::Repository;
    use crate::domain::issue::Issue;
    use crate::domain::issue::IssueStatus;
    use crate::domain::issue::Severity;
    use crate::identifiers::IssueId;
    use crate::identifiers::TenantId;
    use crate::time::Timestamp;
    use std::collections::BTreeSet;

    fn issue(id: &str, severity: Severity) -> Issue {
        Issue {
            id: IssueId::new(id),
            title: "t".to_string(),
            severity,
            status: IssueStatus::Open,
            impacted_reports: BTreeSet::new(),
            impacted_cdes: BTreeSet::new(),
            escalation_level: 0,
            escalated_at: None,
            resolution: None,
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn duplicate_issue_creation_is_rejected() {
        let repo = InMemoryRepository::new();
        let tenant = TenantId::new("t1");
        repo.create_issue(&tenant, issue("i1", Severity::Low)).unwrap_or_else(|err| panic!("{err}"));
        let result = repo.create_issue(&tenant, issue("i1", Severity::Low));
        assert!(result.is_err());
    }

    #[test]
    fn returned_values_are_independent_copies() {
        let repo = InMemoryRepository::new();
        let tenant = TenantId::new("t1");
        repo.create_issue(&tenant, issue("i1", Severity::Low)).unwrap_or_else(|err| panic!("{err}"));
        let mut fetched = repo.get_issue(&tenant, &IssueId::new("i1")).unwrap_or_else(|| panic!("missing"));
        fetched.title = "mutated".to_string();
        let refetched = repo.get_issue(&tenant, &IssueId::new("i1")).unwrap_or_else(|| panic!("missing"));
        assert_eq!(refetched.title, "t");
    }

    #[test]
    fn filters_combine_conjunctively() {
        let repo = InMemoryRepository::new();
        let tenant = TenantId::new("t1");
        repo.create_issue(&tenant, issue("i1", Severity::Critical)).unwrap_or_else(|err| panic!("{err}"));
        repo.create_issue(&tenant, issue("i2", Severity::Low)).unwrap_or_else(|err| panic!("{err}"));
        let filter = IssueFilter {
            severity: Some(Severity::Critical),
            status: Some(IssueStatus::Open),
            ..Default::default()
        };
        let matched = repo.list_issues(&tenant, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, IssueId::new("i1"));
    }

    #[test]
    fn tenants_are_isolated() {
        let repo = InMemoryRepository::new();
        repo.create_issue(&TenantId::new("a"), issue("i1", Severity::Low)).unwrap_or_else(|err| panic!("{err}"));
        assert!(repo.get_issue(&TenantId::new("b"), &IssueId::new("i1")).is_none());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let repo = InMemoryRepository::new();
        let tenant = TenantId::new("t1");
        repo.create_issue(&tenant, issue("i1", Severity::Critical)).unwrap_or_else(|err| panic!("{err}"));

        let snapshot = repo.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap_or_else(|err| panic!("{err}"));
        let restored_snapshot = serde_json::from_str(&json).unwrap_or_else(|err| panic!("{err}"));
        let restored = InMemoryRepository::from_snapshot(restored_snapshot);

        let fetched = restored.get_issue(&tenant, &IssueId::new("i1")).unwrap_or_else(|| panic!("missing"));
        assert_eq!(fetched.severity, Severity::Critical);
    }
}
