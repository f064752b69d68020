// crates/gov-issues/src/error.rs
// ============================================================================
// Module: Issue Manager Errors
// Description: Failure kinds the issue manager can actually produce.
// ============================================================================

use thiserror::Error;

/// Failure kinds produced by issue-manager operations.
#[derive(Debug, Error)]
pub enum IssueError {
    /// The requested issue does not exist.
    #[error("issue {0} not found")]
    NotFound(String),
    /// An issue with this id already exists.
    #[error("issue {0} already exists")]
    AlreadyExists(String),
    /// `resolveIssue` was called with `implemented_by == verified_by`.
    #[error("four-eyes violation: {actor} cannot both implement and verify a resolution")]
    FourEyesViolation {
        /// The actor that would have implemented and verified the same fix.
        actor: String,
    },
    /// Audit chain append failed while recording this operation.
    #[error(transparent)]
    Audit(#[from] gov_audit::AuditError),
}

impl From<IssueError> for gov_core::GovernanceError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::NotFound(id) => gov_core::GovernanceError::not_found("issue", id),
            IssueError::AlreadyExists(id) => gov_core::GovernanceError::invalid_state(format!("issue {id} already exists")),
            IssueError::FourEyesViolation { actor } => {
                gov_core::GovernanceError::invariant_violation(format!("four-eyes violation by {actor}"))
            }
            IssueError::Audit(audit_err) => audit_err.into(),
        }
    }
}
