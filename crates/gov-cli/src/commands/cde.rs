// crates/gov-cli/src/commands/cde.rs
// ============================================================================
// Module: CDE / DQ Commands
// Description: `gov-cli cde ...` — criticality scoring, threshold-gated
//              inventory generation, and per-dimension DQ rule generation
//              (§6 CDE/DQ). These are pure functions (§4.F); no repository
//              or audit involvement.
// ============================================================================

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;
use clap::Subcommand;
use gov_core::domain::cde::CdeFactors;
use gov_core::domain::cde::CdeScore;
use gov_core::domain::cde::CdeWeights;
use gov_core::domain::dq::DqDimension;
use gov_core::identifiers::CdeId;
use gov_dq::ScoringInput;
use serde::Deserialize;

use crate::error::CliError;
use crate::input::read_json_file;
use crate::output;

/// CDE/DQ subcommands.
#[derive(Debug, Subcommand)]
pub enum CdeCommand {
    /// Scores a batch of data elements (`scoreDataElements`).
    Score(ScoreArgs),
    /// Builds the threshold-gated inventory from a batch of scores (`generateCDEInventory`).
    Inventory(InventoryArgs),
    /// Generates one DQ rule per requested dimension against a CDE (`generateDQRulesForCDE`).
    GenerateRules(GenerateRulesArgs),
}

/// One scoring input read from a `score --input` file.
#[derive(Debug, Deserialize)]
struct ScoreInputRecord {
    id: String,
    name: String,
    factors: CdeFactors,
}

/// Arguments for `cde score`.
#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Path to a JSON array of `{id, name, factors}` records.
    #[arg(long)]
    pub input: PathBuf,
    /// Optional path to a JSON `CdeWeights` object; defaults to uniform `0.25`.
    #[arg(long)]
    pub weights: Option<PathBuf>,
}

/// Arguments for `cde inventory`.
#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Path to a JSON array of `CdeScore` records, e.g. `cde score` output.
    #[arg(long)]
    pub input: PathBuf,
    /// Minimum `overall` score required for inclusion.
    #[arg(long)]
    pub threshold: f64,
    /// Omit the scored rationale text in favor of a terse placeholder.
    #[arg(long)]
    pub no_rationale: bool,
}

/// Arguments for `cde generate-rules`.
#[derive(Debug, Args)]
pub struct GenerateRulesArgs {
    /// Identifier of the CDE the rules are generated against.
    #[arg(long)]
    pub cde_id: String,
    /// Human-readable CDE name, referenced in each rule's name/description.
    #[arg(long)]
    pub cde_name: String,
    /// Comma-separated dimension subset; defaults to all seven.
    #[arg(long, value_delimiter = ',')]
    pub dimensions: Vec<String>,
    /// Team or individual responsible for the generated rules.
    #[arg(long)]
    pub owner: Option<String>,
    /// Optional path to a JSON `{dimension: threshold}` override map.
    #[arg(long)]
    pub thresholds: Option<PathBuf>,
}

/// Parses a dimension name from its `label()` text.
fn parse_dimension(raw: &str) -> Result<DqDimension, CliError> {
    DqDimension::all()
        .into_iter()
        .find(|dimension| dimension.label() == raw)
        .ok_or_else(|| CliError::InvalidArgument(format!("unrecognized DQ dimension {raw:?}")))
}

/// Dispatches one [`CdeCommand`].
///
/// # Errors
/// Returns [`CliError::Input`]/[`CliError::InputFormat`] if an ops-file
/// can't be read or parsed, or [`CliError::InvalidArgument`] for an
/// unrecognized dimension name.
pub fn run(command: CdeCommand) -> Result<(), CliError> {
    match command {
        CdeCommand::Score(args) => {
            let records: Vec<ScoreInputRecord> = read_json_file(&args.input)?;
            let inputs: Vec<ScoringInput> = records
                .into_iter()
                .map(|record| ScoringInput {
                    id: CdeId::new(record.id),
                    name: record.name,
                    factors: record.factors,
                })
                .collect();
            let weights: Option<CdeWeights> = args.weights.map(|path| read_json_file(&path)).transpose()?;
            let scores = gov_dq::score_elements(&inputs, weights);
            output::write_json(&scores)
        }
        CdeCommand::Inventory(args) => {
            let scores: Vec<CdeScore> = read_json_file(&args.input)?;
            let inventory = gov_dq::generate_cde_inventory(&scores, args.threshold, !args.no_rationale);
            output::write_json(&inventory)
        }
        CdeCommand::GenerateRules(args) => {
            let dimensions = args.dimensions.iter().map(|raw| parse_dimension(raw)).collect::<Result<Vec<_>, _>>()?;
            let dimensions = if dimensions.is_empty() { None } else { Some(dimensions.as_slice()) };
            let thresholds: Option<HashMap<DqDimension, f64>> = args
                .thresholds
                .map(|path| read_json_file::<HashMap<String, f64>>(&path))
                .transpose()?
                .map(|raw| raw.into_iter().filter_map(|(key, value)| parse_dimension(&key).ok().map(|dim| (dim, value))).collect());
            let rules = gov_dq::generate_dq_rules(&CdeId::new(args.cde_id), &args.cde_name, dimensions, thresholds.as_ref(), args.owner.as_deref());
            output::write_json(&rules)
        }
    }
}
