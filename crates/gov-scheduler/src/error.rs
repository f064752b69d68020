// crates/gov-scheduler/src/error.rs
// ============================================================================
// Module: Scheduler Errors
// Description: Failure kinds the scheduler can actually produce.
// ============================================================================

use thiserror::Error;

/// Failure kinds produced by scheduler operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The requested scheduled task does not exist.
    #[error("scheduled task {0} not found")]
    NotFound(String),
}

impl From<SchedulerError> for gov_core::GovernanceError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::NotFound(id) => gov_core::GovernanceError::not_found("scheduled_task", id),
        }
    }
}
