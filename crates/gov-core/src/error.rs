// crates/gov-core/src/error.rs
// ============================================================================
// Module: Governance Error
// Description: Crate-spanning error enum aggregating the failure kinds shared
//              by every governance subsystem.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Each subsystem crate (`gov-audit`, `gov-workflow`, `gov-issues`, ...)
//! defines its own `thiserror` error enum for concerns local to it, then
//! converts into `GovernanceError` at its public boundary via `#[from]`.
//! Callers that only care about the coarse-grained failure kind can match on
//! `GovernanceError` without depending on every subsystem crate directly.

use thiserror::Error;

/// Failure kinds shared across the governance core.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// The requested entity does not exist in the repository.
    #[error("{entity_type} {entity_id} not found")]
    NotFound {
        /// Human-readable entity family, e.g. `"issue"` or `"cycle"`.
        entity_type: &'static str,
        /// The identifier that was looked up.
        entity_id: String,
    },

    /// The requested transition is not valid from the entity's current state.
    #[error("invalid state transition: {reason}")]
    InvalidState {
        /// Explanation of why the transition was rejected.
        reason: String,
    },

    /// A structural invariant of the governance model was violated.
    #[error("invariant violated: {reason}")]
    InvariantViolation {
        /// Explanation of which invariant failed and why.
        reason: String,
    },

    /// An operation was blocked because one or more critical issues remain open.
    #[error("blocked by {count} open critical issue(s)")]
    BlockedByCriticalIssue {
        /// Number of open critical issues blocking the operation.
        count: usize,
    },

    /// A phase checkpoint has not collected its required approvals.
    #[error("checkpoint incomplete: {completed}/{required} approvals")]
    CheckpointIncomplete {
        /// Approvals collected so far.
        completed: u32,
        /// Approvals required before the checkpoint is satisfied.
        required: u32,
    },

    /// A tenant-scoped quota has been exceeded.
    #[error("quota exceeded: {resource} ({used}/{limit})")]
    QuotaExceeded {
        /// The metered resource whose quota was exceeded.
        resource: String,
        /// Units consumed so far in the current period.
        used: u64,
        /// The configured limit for the current period.
        limit: u64,
    },

    /// The caller's identity does not authorize the attempted action.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// Explanation of the authorization failure.
        reason: String,
    },

    /// A retryable infrastructure failure occurred (the caller may retry).
    #[error("retryable failure: {reason}")]
    Retryable {
        /// Explanation of the underlying failure.
        reason: String,
    },

    /// A non-retryable failure occurred.
    #[error("permanent failure: {reason}")]
    Permanent {
        /// Explanation of the underlying failure.
        reason: String,
    },
}

impl GovernanceError {
    /// Builds a [`GovernanceError::NotFound`] for the given entity family and id.
    #[must_use]
    pub fn not_found(entity_type: &'static str, entity_id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            entity_id: entity_id.into(),
        }
    }

    /// Builds a [`GovernanceError::InvalidState`] with the given reason.
    #[must_use]
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Builds a [`GovernanceError::InvariantViolation`] with the given reason.
    #[must_use]
    pub fn invariant_violation(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Returns `true` if retrying the operation that produced this error might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }
}
