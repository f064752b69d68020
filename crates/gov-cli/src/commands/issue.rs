// crates/gov-cli/src/commands/issue.rs
// ============================================================================
// Module: Issue Commands
// Description: `gov-cli issue ...` — creation, escalation, resolution, and
//              aggregate metrics (§6 Issue).
// ============================================================================

use std::collections::BTreeSet;

use clap::Args;
use clap::Subcommand;
use clap::ValueEnum;
use gov_core::TenantContext;
use gov_core::domain::issue::Issue;
use gov_core::domain::issue::IssueStatus;
use gov_core::domain::issue::Severity;
use gov_core::identifiers::CdeId;
use gov_core::identifiers::IssueId;
use gov_core::identifiers::ReportId;
use gov_core::repository::IssueFilter;
use gov_core::time::Timestamp;
use gov_issues::IssueManager;

use crate::error::CliError;
use crate::output;
use crate::session::Session;

/// Issue subcommands.
#[derive(Debug, Subcommand)]
pub enum IssueCommand {
    /// Creates a new issue (`createIssue`).
    Create(CreateArgs),
    /// Escalates an issue, notifying senior management if critical (`escalateIssue`).
    Escalate(EscalateArgs),
    /// Resolves an issue under the four-eyes gate (`resolveIssue`).
    Resolve(ResolveArgs),
    /// Lists issues matching a filter (`listIssues`).
    List(ListArgs),
    /// Prints aggregate issue metrics (`getMetrics`).
    Metrics,
}

/// The severities `issue create` accepts, mirroring [`Severity`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    /// Cosmetic or informational.
    Low,
    /// Worth tracking but not urgent.
    Medium,
    /// Requires prompt attention.
    High,
    /// Blocks dependent workflow transitions until resolved.
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Low => Self::Low,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::High => Self::High,
            SeverityArg::Critical => Self::Critical,
        }
    }
}

/// Arguments for `issue create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Issue title.
    #[arg(long)]
    pub title: String,
    /// Severity of the issue.
    #[arg(long, value_enum)]
    pub severity: SeverityArg,
    /// Report ids impacted by this issue.
    #[arg(long = "impacted-report")]
    pub impacted_reports: Vec<String>,
    /// CDE ids impacted by this issue.
    #[arg(long = "impacted-cde")]
    pub impacted_cdes: Vec<String>,
}

/// Arguments for `issue escalate`.
#[derive(Debug, Args)]
pub struct EscalateArgs {
    /// Issue to escalate.
    #[arg(long)]
    pub issue_id: String,
    /// Reason recorded for the escalation.
    #[arg(long)]
    pub reason: String,
}

/// Arguments for `issue resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Issue to resolve.
    #[arg(long)]
    pub issue_id: String,
    /// Category of fix applied, e.g. `data_correction`.
    #[arg(long = "type")]
    pub resolution_type: String,
    /// Free-form description of the fix.
    #[arg(long)]
    pub description: String,
    /// Actor who implemented the fix.
    #[arg(long)]
    pub implemented_by: String,
    /// Actor who independently verified the fix; must differ from `implemented_by`.
    #[arg(long)]
    pub verified_by: String,
}

/// Arguments for `issue list`.
#[derive(Debug, Args, Default)]
pub struct ListArgs {
    /// Restrict to this severity.
    #[arg(long, value_enum)]
    pub severity: Option<SeverityArg>,
    /// Restrict to issues impacting this report.
    #[arg(long)]
    pub impacted_report: Option<String>,
    /// Restrict to issues impacting this CDE.
    #[arg(long)]
    pub impacted_cde: Option<String>,
}

/// Dispatches one [`IssueCommand`] against `session`.
///
/// # Errors
/// Propagates [`gov_core::GovernanceError`] wrapped as [`CliError`].
pub fn run(command: IssueCommand, session: &Session, ctx: &TenantContext) -> Result<(), CliError> {
    let manager = IssueManager::new(session.repository.clone(), session.audit.clone());

    match command {
        IssueCommand::Create(args) => {
            let issue = Issue {
                id: IssueId::new(""),
                title: args.title,
                severity: args.severity.into(),
                status: IssueStatus::Open,
                impacted_reports: args.impacted_reports.into_iter().map(ReportId::new).collect::<BTreeSet<_>>(),
                impacted_cdes: args.impacted_cdes.into_iter().map(CdeId::new).collect::<BTreeSet<_>>(),
                escalation_level: 0,
                escalated_at: None,
                resolution: None,
                created_at: Timestamp::now(),
            };
            let created = manager.create_issue(ctx, issue).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&created)
        }
        IssueCommand::Escalate(args) => {
            let issue = manager.escalate_issue(ctx, &IssueId::new(args.issue_id), &args.reason).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&issue)
        }
        IssueCommand::Resolve(args) => {
            let issue = manager
                .resolve_issue(ctx, &IssueId::new(args.issue_id), &args.resolution_type, &args.description, &args.implemented_by, &args.verified_by)
                .map_err(gov_core::GovernanceError::from)?;
            output::write_json(&issue)
        }
        IssueCommand::List(args) => {
            let filter = IssueFilter {
                severity: args.severity.map(Into::into),
                status: None,
                impacted_report: args.impacted_report.map(ReportId::new),
                impacted_cde: args.impacted_cde.map(CdeId::new),
            };
            let issues = manager.list_issues(ctx, &filter);
            output::write_json(&issues)
        }
        IssueCommand::Metrics => {
            let metrics = manager.metrics(ctx);
            output::write_json(&metrics)
        }
    }
}
