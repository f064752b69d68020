// crates/gov-cli/src/main.rs
// ============================================================================
// Binary: gov-cli
// Description: Command-line entry point over the governance core engines
//              (§6). Loads configuration, resolves the caller's tenant
//              context, dispatches to one of the five command groups, and
//              persists the session snapshot back to disk.
// ============================================================================

//! ## Overview
//! `gov-cli` is the one command surface every subsystem crate is exercised
//! through in this workspace: it owns the only `main`, the only
//! `tracing-subscriber` installation, and the only session file I/O. A
//! top-level [`clap::Parser`] with global flags dispatches to a `Commands`
//! enum of subcommand groups, wiring configuration, identity, and session
//! state before delegating to each group's `run`.

mod commands;
mod error;
mod input;
mod output;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use gov_core::ActorType;
use gov_core::TenantContext;
use gov_core::identifiers::SessionId;
use gov_core::identifiers::TenantId;
use gov_core::identity::Claims;
use gov_core::identity::StaticIdentityVerifier;

use crate::error::CliError;
use crate::session::Session;

/// Governance core command-line interface.
#[derive(Debug, Parser)]
#[command(name = "gov-cli", about = "Regulatory reporting governance core command surface", version)]
struct Cli {
    /// Path to `governance.toml`; built-in defaults apply if absent.
    #[arg(long, global = true, default_value = "governance.toml")]
    config: PathBuf,
    /// Path to the session snapshot file, loaded at start and saved at exit.
    #[arg(long, global = true, default_value = "gov-session.json")]
    session: PathBuf,
    /// Tenant the command is scoped to.
    #[arg(long, global = true, default_value = "default")]
    tenant: String,
    /// Actor performing the command, recorded on audit entries unless a
    /// privileged command's access token supersedes it.
    #[arg(long, global = true, default_value = "cli-user")]
    actor: String,
    /// Kind of the acting entity.
    #[arg(long, global = true, value_enum, default_value = "human")]
    actor_type: ActorTypeArg,
    /// Session identifier correlating this invocation's audit entries.
    #[arg(long, global = true)]
    session_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// The kinds of acting entity `--actor-type` accepts, mirroring [`ActorType`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActorTypeArg {
    /// A human user acting through a reviewed interface.
    Human,
    /// An autonomous or semi-autonomous agent.
    Agent,
    /// The system itself, e.g. a scheduled job or automated transition.
    System,
}

impl From<ActorTypeArg> for ActorType {
    fn from(value: ActorTypeArg) -> Self {
        match value {
            ActorTypeArg::Human => Self::Human,
            ActorTypeArg::Agent => Self::Agent,
            ActorTypeArg::System => Self::System,
        }
    }
}

/// Top-level command groups, one per §6 command-surface section.
#[derive(Debug, Subcommand)]
enum Commands {
    /// The report catalog review lifecycle.
    Catalog {
        /// Selected catalog subcommand.
        #[command(subcommand)]
        command: commands::catalog::CatalogCommand,
    },
    /// The cycle state machine and human-task lifecycle.
    Cycle {
        /// Selected cycle subcommand.
        #[command(subcommand)]
        command: commands::cycle::CycleCommand,
    },
    /// Issue creation, escalation, resolution, and metrics.
    Issue {
        /// Selected issue subcommand.
        #[command(subcommand)]
        command: commands::issue::IssueCommand,
    },
    /// CDE scoring, inventory generation, and DQ rule generation.
    Cde {
        /// Selected CDE/DQ subcommand.
        #[command(subcommand)]
        command: commands::cde::CdeCommand,
    },
    /// Chain listing, verification, export, and Merkle proofs.
    Audit {
        /// Selected audit subcommand.
        #[command(subcommand)]
        command: commands::audit::AuditCommand,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if output::write_error_line(&format!("error: {err}")).is_err() {
                tracing::error!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let env_overrides: Vec<(String, String)> = std::env::vars().filter(|(key, _)| key.starts_with("GOV_")).collect();
    let settings = gov_config::load_with_env_overrides(Some(&cli.config), &env_overrides)?;

    let verifier = Arc::new(settings.identity.tokens.iter().fold(StaticIdentityVerifier::new(), |verifier, entry| {
        verifier.with_token(entry.token.clone(), Claims::new(entry.subject.clone()))
    }));

    let session = Session::load(&cli.session)?;
    let ctx = TenantContext::new(
        TenantId::new(cli.tenant),
        cli.session_id.map_or_else(SessionId::generate, |raw| SessionId::new(raw)),
        cli.actor,
        cli.actor_type.into(),
    );

    tracing::info!(tenant = %ctx.tenant_id, actor = %ctx.actor, "dispatching command");

    match cli.command {
        Commands::Catalog { command } => commands::catalog::run(command, &session, &ctx, &verifier)?,
        Commands::Cycle { command } => commands::cycle::run(command, &session, &ctx)?,
        Commands::Issue { command } => commands::issue::run(command, &session, &ctx)?,
        Commands::Cde { command } => commands::cde::run(command)?,
        Commands::Audit { command } => commands::audit::run(command, &session, &ctx)?,
    }

    session.save(&cli.session)
}
