// crates/gov-workflow/src/error.rs
// ============================================================================
// Module: Workflow Engine Errors
// Description: Failure kinds the workflow engine can actually produce.
// ============================================================================

use thiserror::Error;

/// Failure kinds produced by workflow-engine operations. Has no
/// `quota_exceeded` variant — that kind only applies to `gov-metering`.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requested report, cycle, catalog, or task does not exist.
    #[error("{entity_type} {entity_id} not found")]
    NotFound {
        /// Entity family.
        entity_type: &'static str,
        /// Identifier that was looked up.
        entity_id: String,
    },

    /// The command is not valid from the entity's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A gate or structural invariant rejected the command.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// G-critical-issue blocked the command.
    #[error("blocked by {count} open critical issue(s) against this report")]
    BlockedByCriticalIssue {
        /// Number of blocking critical issues.
        count: usize,
    },

    /// A phase checkpoint has not collected its required approvals.
    #[error("checkpoint incomplete: {completed}/{required} approvals")]
    CheckpointIncomplete {
        /// Approvals collected so far.
        completed: usize,
        /// Approvals required.
        required: usize,
    },

    /// Identity verification rejected a privileged command's access token.
    #[error(transparent)]
    Unauthorized(#[from] gov_core::GovernanceError),

    /// Audit chain append failed while recording this operation.
    #[error(transparent)]
    Audit(#[from] gov_audit::AuditError),
}

impl From<WorkflowError> for gov_core::GovernanceError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound { entity_type, entity_id } => gov_core::GovernanceError::not_found(entity_type, entity_id),
            WorkflowError::InvalidState(reason) => gov_core::GovernanceError::invalid_state(reason),
            WorkflowError::InvariantViolation(reason) => gov_core::GovernanceError::invariant_violation(reason),
            WorkflowError::BlockedByCriticalIssue { count } => gov_core::GovernanceError::BlockedByCriticalIssue { count },
            WorkflowError::CheckpointIncomplete { completed, required } => gov_core::GovernanceError::CheckpointIncomplete {
                #[allow(clippy::cast_possible_truncation, reason = "approval counts are bounded by the number of configured roles, never near u32::MAX")]
                completed: completed as u32,
                #[allow(clippy::cast_possible_truncation, reason = "approval counts are bounded by the number of configured roles, never near u32::MAX")]
                required: required as u32,
            },
            WorkflowError::Unauthorized(governance_err) => governance_err,
            WorkflowError::Audit(audit_err) => audit_err.into(),
        }
    }
}
