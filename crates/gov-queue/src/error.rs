// crates/gov-queue/src/error.rs
// ============================================================================
// Module: Queue Errors
// Description: Failure kinds the queue abstraction can actually produce.
// ============================================================================

use thiserror::Error;

/// Failure kinds produced by queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The named queue has not been created.
    #[error("queue {0} not found")]
    QueueNotFound(String),
    /// A queue with this name already exists.
    #[error("queue {0} already exists")]
    QueueAlreadyExists(String),
    /// The receipt handle does not correspond to an in-flight message.
    #[error("receipt {0} not found or already deleted")]
    ReceiptNotFound(String),
}

impl From<QueueError> for gov_core::GovernanceError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::QueueNotFound(name) => gov_core::GovernanceError::not_found("queue", name),
            QueueError::QueueAlreadyExists(name) => gov_core::GovernanceError::invalid_state(format!("queue {name} already exists")),
            QueueError::ReceiptNotFound(receipt) => gov_core::GovernanceError::not_found("receipt", receipt),
        }
    }
}
