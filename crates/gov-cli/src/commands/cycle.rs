// crates/gov-cli/src/commands/cycle.rs
// ============================================================================
// Module: Cycle Commands
// Description: `gov-cli cycle ...` — the cycle state machine and human-task
//              lifecycle (§6 Cycle).
// ============================================================================

use clap::Args;
use clap::Subcommand;
use clap::ValueEnum;
use gov_core::TenantContext;
use gov_core::domain::task::DecisionOutcome;
use gov_core::domain::task::HumanTaskType;
use gov_core::identifiers::CycleId;
use gov_core::identifiers::HumanTaskId;
use gov_core::identifiers::ReportId;
use gov_core::time::Timestamp;
use gov_workflow::AgentType;
use gov_workflow::CycleEngine;

use crate::error::CliError;
use crate::output;
use crate::session::Session;

/// Cycle subcommands.
#[derive(Debug, Subcommand)]
pub enum CycleCommand {
    /// Starts a cycle for an approved report (`startCycle`).
    Start(StartArgs),
    /// Pauses an active cycle (`pauseCycle`).
    Pause(PauseArgs),
    /// Resumes a paused cycle, gated by G-critical-issue (`resumeCycle`).
    Resume(ResumeArgs),
    /// Advances to the next phase (`advancePhase`).
    Advance(AdvanceArgs),
    /// Dispatches an agent type against a cycle (`triggerAgent`).
    TriggerAgent(TriggerAgentArgs),
    /// Creates a human task attached to a cycle (`createHumanTask`).
    CreateTask(CreateTaskArgs),
    /// Completes a human task (`completeHumanTask`).
    CompleteTask(CompleteTaskArgs),
    /// Lists cycles for a report.
    List(ListArgs),
}

/// Arguments for `cycle start`.
#[derive(Debug, Args)]
pub struct StartArgs {
    /// Report to start a cycle for.
    #[arg(long)]
    pub report_id: String,
    /// RFC 3339 end of the reporting period.
    #[arg(long)]
    pub period_end: String,
}

/// Arguments for `cycle pause`.
#[derive(Debug, Args)]
pub struct PauseArgs {
    /// Cycle to pause.
    #[arg(long)]
    pub cycle_id: String,
    /// Reason recorded for the pause.
    #[arg(long)]
    pub reason: String,
}

/// Arguments for `cycle resume`.
#[derive(Debug, Args)]
pub struct ResumeArgs {
    /// Cycle to resume.
    #[arg(long)]
    pub cycle_id: String,
    /// Rationale recorded for the resumption.
    #[arg(long)]
    pub rationale: String,
}

/// Arguments for `cycle advance`.
#[derive(Debug, Args)]
pub struct AdvanceArgs {
    /// Cycle to advance.
    #[arg(long)]
    pub cycle_id: String,
    /// Rationale recorded for the advance.
    #[arg(long)]
    pub rationale: String,
}

/// The agent kinds `trigger-agent` accepts, mirroring [`AgentType`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AgentTypeArg {
    /// `regulatory_intelligence`.
    RegulatoryIntelligence,
    /// `data_requirements`.
    DataRequirements,
    /// `cde_identification`.
    CdeIdentification,
    /// `lineage_mapping`.
    LineageMapping,
    /// `data_quality_rule`.
    DataQualityRule,
    /// `issue_management`.
    IssueManagement,
    /// `documentation`.
    Documentation,
}

impl From<AgentTypeArg> for AgentType {
    fn from(value: AgentTypeArg) -> Self {
        match value {
            AgentTypeArg::RegulatoryIntelligence => Self::RegulatoryIntelligence,
            AgentTypeArg::DataRequirements => Self::DataRequirements,
            AgentTypeArg::CdeIdentification => Self::CdeIdentification,
            AgentTypeArg::LineageMapping => Self::LineageMapping,
            AgentTypeArg::DataQualityRule => Self::DataQualityRule,
            AgentTypeArg::IssueManagement => Self::IssueManagement,
            AgentTypeArg::Documentation => Self::Documentation,
        }
    }
}

/// Arguments for `cycle trigger-agent`.
#[derive(Debug, Args)]
pub struct TriggerAgentArgs {
    /// Cycle to dispatch against.
    #[arg(long)]
    pub cycle_id: String,
    /// Agent type to dispatch.
    #[arg(long, value_enum)]
    pub agent_type: AgentTypeArg,
}

/// The human-task kinds `create-task` accepts, mirroring [`HumanTaskType`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HumanTaskTypeArg {
    /// `attestation`.
    Attestation,
    /// `data_quality_review`.
    DataQualityReview,
    /// `approval`.
    Approval,
    /// `review`.
    Review,
}

impl From<HumanTaskTypeArg> for HumanTaskType {
    fn from(value: HumanTaskTypeArg) -> Self {
        match value {
            HumanTaskTypeArg::Attestation => Self::Attestation,
            HumanTaskTypeArg::DataQualityReview => Self::DataQualityReview,
            HumanTaskTypeArg::Approval => Self::Approval,
            HumanTaskTypeArg::Review => Self::Review,
        }
    }
}

/// Arguments for `cycle create-task`.
#[derive(Debug, Args)]
pub struct CreateTaskArgs {
    /// Cycle the task is attached to.
    #[arg(long)]
    pub cycle_id: String,
    /// Kind of task.
    #[arg(long, value_enum)]
    pub task_type: HumanTaskTypeArg,
    /// Human-readable title.
    #[arg(long)]
    pub title: String,
    /// Individual assigned to the task.
    #[arg(long)]
    pub assigned_to: String,
    /// Role the assignee acts in, matched against the checkpoint's required roles.
    #[arg(long)]
    pub assigned_role: String,
    /// RFC 3339 due date.
    #[arg(long)]
    pub due_date: String,
}

/// The decision outcomes `complete-task` accepts, mirroring [`DecisionOutcome`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DecisionOutcomeArg {
    /// Approved without reservation.
    Approved,
    /// Rejected outright.
    Rejected,
    /// Approved contingent on follow-up changes.
    ApprovedWithChanges,
}

impl From<DecisionOutcomeArg> for DecisionOutcome {
    fn from(value: DecisionOutcomeArg) -> Self {
        match value {
            DecisionOutcomeArg::Approved => Self::Approved,
            DecisionOutcomeArg::Rejected => Self::Rejected,
            DecisionOutcomeArg::ApprovedWithChanges => Self::ApprovedWithChanges,
        }
    }
}

/// Arguments for `cycle complete-task`.
#[derive(Debug, Args)]
pub struct CompleteTaskArgs {
    /// Task to complete.
    #[arg(long)]
    pub task_id: String,
    /// Outcome reached.
    #[arg(long, value_enum)]
    pub outcome: DecisionOutcomeArg,
    /// Rationale; must be at least 20 characters.
    #[arg(long)]
    pub rationale: String,
    /// Actor completing the task.
    #[arg(long)]
    pub completed_by: String,
}

/// Arguments for `cycle list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Report to list cycles for.
    #[arg(long)]
    pub report_id: String,
}

/// Parses an RFC 3339 timestamp from a CLI argument.
fn parse_timestamp(raw: &str) -> Result<Timestamp, CliError> {
    Timestamp::parse(raw).map_err(|err| CliError::InvalidArgument(format!("{raw:?} is not a valid RFC 3339 timestamp: {err}")))
}

/// Dispatches one [`CycleCommand`] against `session`.
///
/// # Errors
/// Propagates [`gov_core::GovernanceError`] wrapped as [`CliError`].
pub fn run(command: CycleCommand, session: &Session, ctx: &TenantContext) -> Result<(), CliError> {
    let engine = CycleEngine::new(session.repository.clone(), session.audit.clone());

    match command {
        CycleCommand::Start(args) => {
            let period_end = parse_timestamp(&args.period_end)?;
            let cycle = engine.start_cycle(ctx, &ReportId::new(args.report_id), period_end).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&cycle)
        }
        CycleCommand::Pause(args) => {
            let cycle = engine.pause_cycle(ctx, &CycleId::new(args.cycle_id), &args.reason).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&cycle)
        }
        CycleCommand::Resume(args) => {
            let cycle = engine.resume_cycle(ctx, &CycleId::new(args.cycle_id), &args.rationale).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&cycle)
        }
        CycleCommand::Advance(args) => {
            let cycle = engine.advance_phase(ctx, &CycleId::new(args.cycle_id), &args.rationale).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&cycle)
        }
        CycleCommand::TriggerAgent(args) => {
            engine
                .trigger_agent(ctx, &CycleId::new(args.cycle_id), args.agent_type.into())
                .map_err(gov_core::GovernanceError::from)?;
            output::write_line("agent dispatch authorized")
        }
        CycleCommand::CreateTask(args) => {
            let due_date = parse_timestamp(&args.due_date)?;
            let task = engine
                .create_human_task(
                    ctx,
                    &CycleId::new(args.cycle_id),
                    args.task_type.into(),
                    &args.title,
                    &args.assigned_to,
                    &args.assigned_role,
                    due_date,
                )
                .map_err(gov_core::GovernanceError::from)?;
            output::write_json(&task)
        }
        CycleCommand::CompleteTask(args) => {
            let task = engine
                .complete_human_task(ctx, &HumanTaskId::new(args.task_id), args.outcome.into(), &args.rationale, &args.completed_by)
                .map_err(gov_core::GovernanceError::from)?;
            output::write_json(&task)
        }
        CycleCommand::List(args) => {
            let cycles = engine.list_cycles_for_report(ctx, &ReportId::new(args.report_id));
            output::write_json(&cycles)
        }
    }
}
