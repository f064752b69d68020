// crates/gov-audit/src/error.rs
// ============================================================================
// Module: Audit Chain Errors
// Description: Failure kinds the audit chain can actually produce.
// ============================================================================

use thiserror::Error;

/// Failure kinds produced by audit-chain operations.
///
/// `chain_broken`/`hash_tampered` (§7) are deliberately absent: per spec they
/// are "reported, never raised" — they surface as fields of
/// [`crate::chain::ChainVerification`], not as an `Err` variant.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The requested entry does not exist in the chain.
    #[error("audit entry {0} not found")]
    NotFound(String),
    /// Canonicalization or hashing of an entry failed.
    #[error(transparent)]
    Hashing(#[from] crate::hashing::HashError),
}

impl From<AuditError> for gov_core::GovernanceError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::NotFound(id) => gov_core::GovernanceError::not_found("audit_entry", id),
            AuditError::Hashing(hash_err) => gov_core::GovernanceError::Permanent {
                reason: hash_err.to_string(),
            },
        }
    }
}
