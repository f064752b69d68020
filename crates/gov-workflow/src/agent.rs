// crates/gov-workflow/src/agent.rs
// ============================================================================
// Module: Agent Trigger Types
// Description: The agent kinds `triggerAgent` accepts and their per-phase
//              prerequisites.
// ============================================================================

//! ## Overview
//! `triggerAgent` fans out to external agent/LLM tooling (out of scope for
//! this core, §1); this module only encodes the phase-readiness predicate
//! `triggerAgent` must pass before dispatching (§4.D).

use gov_core::domain::cycle::CheckpointStatus;
use gov_core::domain::cycle::CycleInstance;
use gov_core::domain::cycle::Phase;
use serde::Deserialize;
use serde::Serialize;

/// The kind of agent a `triggerAgent` command may dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Scans regulatory sources for applicable changes.
    RegulatoryIntelligence,
    /// Derives data requirements from regulatory text.
    DataRequirements,
    /// Identifies candidate critical data elements.
    CdeIdentification,
    /// Maps data lineage for impacted elements.
    LineageMapping,
    /// Generates data-quality rules.
    DataQualityRule,
    /// Assists with issue triage/management.
    IssueManagement,
    /// Drafts supporting documentation.
    Documentation,
}

impl AgentType {
    /// Returns `true` if `cycle` has progressed far enough for this agent
    /// type to be dispatched, per the phase-prerequisite table in §4.D.
    #[must_use]
    pub fn prerequisite_met(self, cycle: &CycleInstance) -> bool {
        match self {
            Self::RegulatoryIntelligence | Self::DataRequirements | Self::CdeIdentification | Self::LineageMapping => true,
            Self::DataQualityRule | Self::IssueManagement => checkpoint_completed(cycle, Phase::DataGathering),
            Self::Documentation => checkpoint_completed(cycle, Phase::Validation),
        }
    }
}

/// Returns `true` if `cycle`'s checkpoint for `phase` is completed, which
/// also implies the cycle has advanced at least to the phase after it.
fn checkpoint_completed(cycle: &CycleInstance, phase: Phase) -> bool {
    cycle
        .checkpoint_for(phase)
        .is_some_and(|checkpoint| checkpoint.status == CheckpointStatus::Completed)
}
