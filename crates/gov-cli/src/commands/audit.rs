// crates/gov-cli/src/commands/audit.rs
// ============================================================================
// Module: Audit Commands
// Description: `gov-cli audit ...` — listing, chain verification, export,
//              and Merkle inclusion proofs (§6 Audit).
// ============================================================================

use clap::Args;
use clap::Subcommand;
use gov_audit::AuditFilter;
use gov_core::TenantContext;
use gov_core::identifiers::AuditEntryId;

use crate::error::CliError;
use crate::output;
use crate::session::Session;

/// Audit subcommands. `append` is not exposed directly — every other
/// command's `run` appends the entries its operation requires; a bare
/// `append` would let a caller forge history outside the domain commands
/// that are supposed to produce it.
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Lists entries matching a conjunctive filter, most recent first (`listEntries`).
    List(ListArgs),
    /// Verifies the hash chain over an optional sequence range (`verifyChain`).
    Verify(RangeArgs),
    /// Exports a range with its Merkle root, independently verifiable (`exportWithProofs`).
    Export(RangeArgs),
    /// Produces an inclusion proof for one entry (`merkleProof`).
    Proof(ProofArgs),
}

/// Arguments for `audit list`.
#[derive(Debug, Args, Default)]
pub struct ListArgs {
    /// Restrict to this entity family.
    #[arg(long)]
    pub entity_type: Option<String>,
    /// Restrict to this entity id.
    #[arg(long)]
    pub entity_id: Option<String>,
    /// Restrict to this actor.
    #[arg(long)]
    pub actor: Option<String>,
    /// Restrict to this action name.
    #[arg(long)]
    pub action: Option<String>,
    /// Cap the number of results returned.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Shared `[start, end]` sequence-range arguments for `verify`/`export`.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// First sequence number in range, inclusive; defaults to the first entry.
    #[arg(long)]
    pub start: Option<u64>,
    /// Last sequence number in range, inclusive; defaults to the last entry.
    #[arg(long)]
    pub end: Option<u64>,
}

/// Arguments for `audit proof`.
#[derive(Debug, Args)]
pub struct ProofArgs {
    /// Entry to produce an inclusion proof for.
    #[arg(long)]
    pub entry_id: String,
}

/// Dispatches one [`AuditCommand`] against `session`.
///
/// # Errors
/// Propagates [`gov_core::GovernanceError`] wrapped as [`CliError`].
pub fn run(command: AuditCommand, session: &Session, ctx: &TenantContext) -> Result<(), CliError> {
    let chain = session.audit.chain_for(&ctx.tenant_id);

    match command {
        AuditCommand::List(args) => {
            let filter = AuditFilter {
                entity_type: args.entity_type,
                entity_id: args.entity_id,
                actor: args.actor,
                action: args.action,
                since: None,
                until: None,
                limit: args.limit,
            };
            let entries = chain.list_entries(&filter);
            output::write_json(&entries)
        }
        AuditCommand::Verify(args) => {
            let verification = chain.verify_chain(args.start, args.end);
            output::write_json(&verification)
        }
        AuditCommand::Export(args) => {
            let export = gov_audit::export(&chain, &ctx.tenant_id, args.start, args.end);
            output::write_json(&export)
        }
        AuditCommand::Proof(args) => {
            let proof = chain.merkle_proof(&AuditEntryId::new(args.entry_id)).map_err(gov_core::GovernanceError::from)?;
            output::write_json(&proof)
        }
    }
}
