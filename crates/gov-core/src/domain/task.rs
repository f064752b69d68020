// crates/gov-core/src/domain/task.rs
// ============================================================================
// Module: Human Task
// Description: Human-in-the-loop review and approval tasks attached to a
//              cycle.
// ============================================================================

//! ## Overview
//! A `HumanTask` represents work assigned to a person during a cycle, such as
//! an attestation or a data-quality sign-off. `status = Completed` always
//! implies `decision` is present.

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::CycleId;
use crate::identifiers::HumanTaskId;
use crate::time::Timestamp;

/// The kind of human task, named after the gate or checkpoint it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumanTaskType {
    /// Sign-off that the data in a cycle is complete and accurate.
    Attestation,
    /// Review of data quality rule violations.
    DataQualityReview,
    /// General approval task tied to a checkpoint role.
    Approval,
    /// Free-form review task.
    Review,
}

/// Lifecycle status of a [`HumanTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet started.
    Pending,
    /// Being worked on.
    InProgress,
    /// Finished; `decision` is populated.
    Completed,
}

/// The outcome recorded when a [`HumanTask`] is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Approved without reservation.
    Approved,
    /// Rejected outright.
    Rejected,
    /// Approved contingent on follow-up changes.
    ApprovedWithChanges,
}

impl DecisionOutcome {
    /// Returns `true` if this outcome should count toward a checkpoint's
    /// completed approvals.
    #[must_use]
    pub fn counts_as_approval(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// The recorded decision for a completed [`HumanTask`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// The outcome reached.
    pub outcome: DecisionOutcome,
    /// Rationale supporting the outcome; must be non-empty.
    pub rationale: String,
    /// Actor who completed the task.
    pub completed_by: String,
    /// When the task was completed.
    pub completed_at: Timestamp,
}

/// A unit of human work attached to a cycle.
///
/// # Invariants
/// - `status = Completed` implies `decision` is `Some`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanTask {
    /// Unique identifier.
    pub id: HumanTaskId,
    /// The cycle this task belongs to.
    pub cycle_id: CycleId,
    /// The kind of task.
    pub task_type: HumanTaskType,
    /// Human-readable title.
    pub title: String,
    /// Individual assigned to the task.
    pub assigned_to: String,
    /// Role the assignee is acting in, used for checkpoint matching.
    pub assigned_role: String,
    /// Date the task is due.
    pub due_date: Timestamp,
    /// Current status.
    pub status: TaskStatus,
    /// Recorded decision, present only once `status = Completed`.
    pub decision: Option<Decision>,
}

impl HumanTask {
    /// Returns `true` if this task's decision counts as an approval for its
    /// assigned role.
    #[must_use]
    pub fn is_approving_decision(&self) -> bool {
        self.decision
            .as_ref()
            .is_some_and(|decision| decision.outcome.counts_as_approval())
    }
}
