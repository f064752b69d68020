// crates/gov-cli/src/commands/catalog.rs
// ============================================================================
// Module: Catalog Commands
// Description: `gov-cli catalog ...` — the report catalog review lifecycle
//              (§6 Catalog).
// ============================================================================

use clap::Args;
use clap::Subcommand;
use gov_core::TenantContext;
use gov_core::domain::report::Jurisdiction;
use gov_core::domain::report::RegulatoryReport;
use gov_core::identifiers::ReportId;
use gov_core::identity::AccessToken;
use gov_core::identity::StaticIdentityVerifier;
use gov_core::time::Timestamp;
use gov_workflow::CatalogEngine;
use std::sync::Arc;

use crate::error::CliError;
use crate::output;
use crate::session::Session;

/// Catalog subcommands (`scanSources`/`detectChanges`/`updateCatalog` are the
/// scraper-facing boundary named in §6; since the scraper itself is out of
/// scope, `updateReport` is the thin pass-through those commands would
/// eventually call through to).
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Prints the current catalog (`getCatalog`).
    Get,
    /// Adds or updates a report definition (`updateCatalog`/`modifyCatalog`).
    UpdateReport(UpdateReportArgs),
    /// Submits the catalog for review (`submitForReview`).
    SubmitForReview(TokenArgs),
    /// Approves a catalog in `pending_review` (`approveCatalog`).
    Approve(TokenArgs),
    /// Rejects a catalog in `pending_review` (`rejectCatalog`).
    Reject(RejectArgs),
}

/// Shared optional access-token argument for privileged catalog commands.
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Access token identifying the actor performing this privileged command.
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for `catalog reject`.
#[derive(Debug, Args)]
pub struct RejectArgs {
    /// Rationale recorded for the rejection.
    #[arg(long)]
    pub reason: String,
    #[command(flatten)]
    pub token: TokenArgs,
}

/// Arguments for `catalog update-report`.
#[derive(Debug, Args)]
pub struct UpdateReportArgs {
    /// Report identifier; a new report is created if unseen, else replaced.
    #[arg(long)]
    pub id: String,
    /// Human-readable report name.
    #[arg(long)]
    pub name: String,
    /// Filing jurisdiction (`us` or `ca`).
    #[arg(long, value_parser = parse_jurisdiction)]
    pub jurisdiction: Jurisdiction,
    /// Regulator the report is filed with.
    #[arg(long)]
    pub regulator: String,
    /// Filing frequency, e.g. `quarterly`.
    #[arg(long)]
    pub frequency: String,
    /// Rule describing how the due date is derived from the period end.
    #[arg(long)]
    pub due_date_rule: String,
    /// Organizational unit responsible for the report.
    #[arg(long)]
    pub responsible_unit: String,
}

fn parse_jurisdiction(raw: &str) -> Result<Jurisdiction, String> {
    match raw.to_ascii_lowercase().as_str() {
        "us" => Ok(Jurisdiction::Us),
        "ca" => Ok(Jurisdiction::Ca),
        other => Err(format!("unrecognized jurisdiction {other:?}; expected \"us\" or \"ca\"")),
    }
}

/// Dispatches one [`CatalogCommand`] against `session`.
///
/// # Errors
/// Propagates [`gov_core::GovernanceError`] wrapped as [`CliError`].
pub fn run(command: CatalogCommand, session: &Session, ctx: &TenantContext, verifier: &Arc<StaticIdentityVerifier>) -> Result<(), CliError> {
    let engine = CatalogEngine::new(session.repository.clone(), session.audit.clone(), verifier.clone());

    match command {
        CatalogCommand::Get => {
            let catalog = engine.get_catalog(ctx);
            output::write_json(&catalog)
        }
        CatalogCommand::UpdateReport(args) => {
            let report = RegulatoryReport {
                id: ReportId::new(args.id),
                name: args.name,
                jurisdiction: args.jurisdiction,
                regulator: args.regulator,
                frequency: args.frequency,
                due_date_rule: args.due_date_rule,
                responsible_unit: args.responsible_unit,
                last_updated: Timestamp::now(),
            };
            let catalog = engine.modify_catalog(ctx, report).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&catalog)
        }
        CatalogCommand::SubmitForReview(args) => {
            let catalog = engine.submit_for_review(ctx, args.token.map(AccessToken::new).as_ref()).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&catalog)
        }
        CatalogCommand::Approve(args) => {
            let catalog = engine.approve_catalog(ctx, args.token.map(AccessToken::new).as_ref()).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&catalog)
        }
        CatalogCommand::Reject(args) => {
            let catalog = engine
                .reject_catalog(ctx, &args.reason, args.token.token.map(AccessToken::new).as_ref())
                .map_err(gov_core::GovernanceError::from)?;
            output::write_json(&catalog)
        }
    }
}
