// system-tests/tests/properties.rs
// ============================================================================
// Module: Cross-Crate Testable Properties
// Description: Properties that only show up once two or more subsystem
//              crates are driven together; single-crate properties already
//              have proptest coverage inside their owning crate.
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use gov_core::Repository;
use gov_core::domain::cde::CdeFactors;
use gov_core::domain::cde::CdeScore;
use gov_core::domain::issue::Issue;
use gov_core::domain::issue::IssueStatus;
use gov_core::domain::issue::Severity;
use gov_core::domain::report::CatalogStatus;
use gov_core::domain::report::Jurisdiction;
use gov_core::domain::report::RegulatoryReport;
use gov_core::domain::task::DecisionOutcome;
use gov_core::domain::task::HumanTaskType;
use gov_core::identifiers::CdeId;
use gov_core::identifiers::IssueId;
use gov_core::identifiers::ReportId;
use gov_core::identity::StaticIdentityVerifier;
use gov_core::time::Timestamp;
use gov_workflow::catalog::CatalogEngine;
use gov_workflow::cycle::CycleEngine;
use gov_workflow::error::WorkflowError;
use proptest::prelude::*;
use system_tests::fixtures::Harness;

fn sample_report(id: &str) -> RegulatoryReport {
    RegulatoryReport {
        id: ReportId::new(id),
        name: format!("report {id}"),
        jurisdiction: Jurisdiction::Us,
        regulator: "FED".to_string(),
        frequency: "quarterly".to_string(),
        due_date_rule: "30 days after period end".to_string(),
        responsible_unit: "risk".to_string(),
        last_updated: Timestamp::now(),
    }
}

/// Every state-changing command appends at least one audit entry
/// carrying the fields `listEntries` depends on (actor, action, entity).
#[test]
fn every_cycle_lifecycle_command_is_audited() {
    let harness = Harness::default_tenant();
    let report_id = ReportId::new("r1");
    harness.repository.put_report(&harness.ctx.tenant_id, sample_report("r1"));
    harness.repository.put_catalog(
        &harness.ctx.tenant_id,
        gov_core::domain::report::ReportCatalog {
            version: 1,
            status: CatalogStatus::Approved,
            reports: vec![sample_report("r1")],
            approved_by: Some("bob".to_string()),
            approved_at: Some(Timestamp::now()),
        },
    );
    let cycle_engine = CycleEngine::new(harness.repository.clone(), harness.audit.clone());
    let cycle = cycle_engine.start_cycle(&harness.ctx, &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));
    cycle_engine.pause_cycle(&harness.ctx, &cycle.id, "investigating").unwrap_or_else(|err| panic!("{err}"));
    cycle_engine.resume_cycle(&harness.ctx, &cycle.id, "resolved").unwrap_or_else(|err| panic!("{err}"));

    let chain = harness.audit.chain_for(&harness.ctx.tenant_id);
    let entries = chain.list_entries(&gov_audit::AuditFilter::default());
    assert!(!entries.is_empty());
    for entry in &entries {
        assert!(!entry.entry.actor.is_empty());
        assert!(!entry.entry.action.is_empty());
        assert!(!entry.entry.entity_type.is_empty());
    }
    let actions: BTreeSet<&str> = entries.iter().map(|entry| entry.entry.action.as_str()).collect();
    assert!(actions.contains("start_cycle"));
    assert!(actions.contains("pause_cycle"));
    assert!(actions.contains("resume_cycle"));
}

/// A cycle can never reach `completed` while G-attestation is
/// unsatisfied, even once every phase checkpoint has been cleared.
#[test]
fn cycle_cannot_complete_without_an_approved_attestation_task() {
    let harness = Harness::default_tenant();
    let report_id = ReportId::new("r1");
    harness.repository.put_report(&harness.ctx.tenant_id, sample_report("r1"));
    harness.repository.put_catalog(
        &harness.ctx.tenant_id,
        gov_core::domain::report::ReportCatalog {
            version: 1,
            status: CatalogStatus::Approved,
            reports: vec![sample_report("r1")],
            approved_by: Some("bob".to_string()),
            approved_at: Some(Timestamp::now()),
        },
    );
    let cycle_engine = CycleEngine::new(harness.repository.clone(), harness.audit.clone());
    let mut cycle = cycle_engine.start_cycle(&harness.ctx, &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));

    let roles = ["data_owner", "data_quality_analyst", "reviewer", "approver", "submitter"];
    for (index, role) in roles.iter().enumerate() {
        let task = cycle_engine
            .create_human_task(&harness.ctx, &cycle.id, HumanTaskType::Approval, "clear the checkpoint", "carol", role, Timestamp::now())
            .unwrap_or_else(|err| panic!("{err}"));
        cycle_engine
            .complete_human_task(&harness.ctx, &task.id, DecisionOutcome::Approved, "reviewed thoroughly and found compliant", "carol")
            .unwrap_or_else(|err| panic!("{err}"));

        if index < roles.len() - 1 {
            cycle = cycle_engine.advance_phase(&harness.ctx, &cycle.id, "checkpoint satisfied").unwrap_or_else(|err| panic!("{err}"));
        } else {
            let result = cycle_engine.advance_phase(&harness.ctx, &cycle.id, "final checkpoint satisfied");
            assert!(matches!(result, Err(WorkflowError::InvariantViolation(_))));
        }
    }
    assert_eq!(cycle.status, gov_core::domain::cycle::CycleStatus::Active);
}

/// A catalog never reaches `approved` without having passed through
/// `pending_review` first — `approveCatalog` is the only path to `approved`
/// and it requires `pending_review` as a precondition.
#[test]
fn catalog_only_reaches_approved_through_pending_review() {
    let harness = Harness::default_tenant();
    let verifier = Arc::new(StaticIdentityVerifier::new());
    let engine = CatalogEngine::new(harness.repository.clone(), harness.audit.clone(), verifier);

    let direct_approve = engine.approve_catalog(&harness.ctx, None);
    assert!(direct_approve.is_err());

    engine.modify_catalog(&harness.ctx, sample_report("r1")).unwrap_or_else(|err| panic!("{err}"));
    let still_draft_approve = engine.approve_catalog(&harness.ctx, None);
    assert!(still_draft_approve.is_err());

    let submitted = engine.submit_for_review(&harness.ctx, None).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(submitted.status, CatalogStatus::PendingReview);
    let approved = engine.approve_catalog(&harness.ctx, None).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(approved.status, CatalogStatus::Approved);
}

/// G-critical-issue applies uniformly across `resumeCycle`,
/// `triggerAgent`, and `advancePhase` — an open critical issue
/// against the cycle's report blocks all three.
#[test]
fn critical_issue_blocks_resume_trigger_and_advance_uniformly() {
    let harness = Harness::default_tenant();
    let report_id = ReportId::new("r1");
    harness.repository.put_report(&harness.ctx.tenant_id, sample_report("r1"));
    harness.repository.put_catalog(
        &harness.ctx.tenant_id,
        gov_core::domain::report::ReportCatalog {
            version: 1,
            status: CatalogStatus::Approved,
            reports: vec![sample_report("r1")],
            approved_by: Some("bob".to_string()),
            approved_at: Some(Timestamp::now()),
        },
    );
    let cycle_engine = CycleEngine::new(harness.repository.clone(), harness.audit.clone());
    let cycle = cycle_engine.start_cycle(&harness.ctx, &report_id, Timestamp::now()).unwrap_or_else(|err| panic!("{err}"));

    harness.repository.create_issue(
        &harness.ctx.tenant_id,
        Issue {
            id: IssueId::new("i1"),
            title: "blocking".to_string(),
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

    let advance = cycle_engine.advance_phase(&harness.ctx, &cycle.id, "trying anyway");
    assert!(matches!(advance, Err(WorkflowError::BlockedByCriticalIssue { count: 1 })));

    let trigger = cycle_engine.trigger_agent(&harness.ctx, &cycle.id, gov_workflow::agent::AgentType::RegulatoryIntelligence);
    assert!(matches!(trigger, Err(WorkflowError::BlockedByCriticalIssue { count: 1 })));

    cycle_engine.pause_cycle(&harness.ctx, &cycle.id, "pausing to investigate").unwrap_or_else(|err| panic!("{err}"));
    let resume = cycle_engine.resume_cycle(&harness.ctx, &cycle.id, "trying anyway");
    assert!(matches!(resume, Err(WorkflowError::BlockedByCriticalIssue { count: 1 })));
}

fn factors_strategy() -> impl Strategy<Value = CdeFactors> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(r, b, u, q)| CdeFactors {
        regulatory_sensitivity: r,
        business_impact: b,
        usage_breadth: u,
        quality_risk: q,
    })
}

proptest! {
    /// A scored element is admitted to the inventory if and only if its
    /// overall score meets the threshold, and every admitted element carries
    /// a non-empty rationale.
    #[test]
    fn threshold_inclusion_matches_overall_score(factors in factors_strategy(), threshold in 0.0f64..=1.0) {
        let score = CdeScore {
            id: CdeId::new("e1"),
            name: "element".to_string(),
            factors,
            overall: gov_core::domain::cde::compute_overall_score(&factors, &gov_core::domain::cde::CdeWeights::uniform()),
        };
        let inventory = gov_dq::generate_cde_inventory(&[score.clone()], threshold, true);
        let admitted = !inventory.elements.is_empty();
        prop_assert_eq!(admitted, score.overall >= threshold);
        if admitted {
            prop_assert!(!inventory.elements[0].criticality_rationale.is_empty());
        }
    }

    /// Worker count always stays within `[min_workers, max_workers]`
    /// across an arbitrary sequence of queue-depth observations.
    #[test]
    fn worker_count_never_leaves_its_configured_bounds(depths in proptest::collection::vec(0usize..20, 1..10)) {
        let config = gov_queue::autoscaler::ScalingConfig {
            min_workers: 1,
            max_workers: 6,
            scale_up_threshold: 5,
            scale_down_threshold: 1,
            scale_up_increment: 2,
            scale_down_increment: 1,
            scale_up_cooldown_secs: 0,
            scale_down_cooldown_secs: 0,
        };
        let mut scaler = gov_queue::autoscaler::AutoScaler::new(config);
        let now = Timestamp::now();
        for (index, depth) in depths.into_iter().enumerate() {
            let offset = i64::try_from(index).unwrap_or(i64::MAX);
            let count = scaler.evaluate(depth, now.plus_seconds(offset));
            prop_assert!(count >= 1 && count <= 6);
        }
    }
}
