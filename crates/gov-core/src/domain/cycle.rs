// crates/gov-core/src/domain/cycle.rs
// ============================================================================
// Module: Cycle Instance
// Description: The reporting-cycle state machine: status, phase ordering,
//              and per-phase checkpoints.
// ============================================================================

//! ## Overview
//! A `CycleInstance` tracks one report's journey through a linear sequence of
//! phases, each gated by a [`Checkpoint`]. `current_phase` may
//! only advance in phase order, and only once the current phase's checkpoint
//! has collected every required approval.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::CycleId;
use crate::identifiers::ReportId;
use crate::time::Timestamp;

/// Overall lifecycle status of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Actively progressing through phases.
    Active,
    /// Temporarily halted; may be resumed.
    Paused,
    /// Reached the end of the phase sequence.
    Completed,
    /// Terminated abnormally; no further transitions are valid.
    Failed,
}

/// A phase within the active lifecycle of a cycle.
///
/// The variant order is the only valid advancement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Collecting source data.
    DataGathering,
    /// Validating collected data against quality rules.
    Validation,
    /// Human review of validated data.
    Review,
    /// Final approval before submission.
    Approval,
    /// Submission to the regulator.
    Submission,
}

impl Phase {
    /// Returns the phase that directly follows this one, or `None` if this is
    /// the last phase.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::DataGathering => Some(Self::Validation),
            Self::Validation => Some(Self::Review),
            Self::Review => Some(Self::Approval),
            Self::Approval => Some(Self::Submission),
            Self::Submission => None,
        }
    }

    /// All five phases, in advancement order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [Self::DataGathering, Self::Validation, Self::Review, Self::Approval, Self::Submission]
    }
}

/// Completion status of a single phase's checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointStatus {
    /// Approvals are still outstanding.
    Pending,
    /// All required approvals have been collected.
    Completed,
}

/// Approval gate for a single phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Phase this checkpoint gates.
    pub phase: Phase,
    /// Roles whose approval is required.
    pub required_approvals: BTreeSet<String>,
    /// Roles that have approved so far.
    pub completed_approvals: BTreeSet<String>,
    /// Derived completion status.
    pub status: CheckpointStatus,
}

impl Checkpoint {
    /// Builds a new, unsatisfied checkpoint for `phase` requiring `required_approvals`.
    #[must_use]
    pub fn new(phase: Phase, required_approvals: BTreeSet<String>) -> Self {
        let status = if required_approvals.is_empty() {
            CheckpointStatus::Completed
        } else {
            CheckpointStatus::Pending
        };
        Self {
            phase,
            required_approvals,
            completed_approvals: BTreeSet::new(),
            status,
        }
    }

    /// Records an approval from `role`, updating `status` if every required
    /// role has now approved.
    pub fn record_approval(&mut self, role: impl Into<String>) {
        self.completed_approvals.insert(role.into());
        self.recompute_status();
    }

    /// Recomputes `status` from the current approval sets.
    fn recompute_status(&mut self) {
        if self.required_approvals.is_subset(&self.completed_approvals) {
            self.status = CheckpointStatus::Completed;
        } else {
            self.status = CheckpointStatus::Pending;
        }
    }

    /// Returns `true` if every required approval has been collected.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.status == CheckpointStatus::Completed
    }
}

/// One report's progress through a reporting cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInstance {
    /// Unique identifier.
    pub id: CycleId,
    /// The report this cycle is producing.
    pub report_id: ReportId,
    /// End of the reporting period this cycle covers.
    pub period_end: Timestamp,
    /// Overall cycle status.
    pub status: CycleStatus,
    /// Phase currently in progress, meaningful only while `status = Active`.
    pub current_phase: Phase,
    /// One checkpoint per phase, in phase order.
    pub checkpoints: Vec<Checkpoint>,
    /// When the cycle was started.
    pub started_at: Timestamp,
    /// Reason recorded the last time the cycle was paused, if any.
    pub pause_reason: Option<String>,
}

impl CycleInstance {
    /// Returns the checkpoint for `phase`, if present.
    #[must_use]
    pub fn checkpoint_for(&self, phase: Phase) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|checkpoint| checkpoint.phase == phase)
    }

    /// Returns a mutable reference to the checkpoint for `phase`, if present.
    pub fn checkpoint_for_mut(&mut self, phase: Phase) -> Option<&mut Checkpoint> {
        self.checkpoints.iter_mut().find(|checkpoint| checkpoint.phase == phase)
    }

    /// Returns the checkpoint gating the phase currently in progress.
    #[must_use]
    pub fn current_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoint_for(self.current_phase)
    }
}
