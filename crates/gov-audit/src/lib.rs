// crates/gov-audit/src/lib.rs
// ============================================================================
// Crate: gov-audit
// Description: Append-only, SHA-256 hash-chained, Merkle-provable audit log.
// ============================================================================

//! # gov-audit
//!
//! Component C of the governance core (§4.C): a per-tenant append-only audit
//! chain where each entry commits to its predecessor's hash, a binary Merkle
//! tree over entry hashes for inclusion proofs, and self-contained exports an
//! external party can verify without the live store.

/// Per-tenant append-only hash chain and its multi-tenant registry.
pub mod chain;
/// Errors the audit chain can produce.
pub mod error;
/// Self-contained, externally verifiable chain exports.
pub mod export;
/// Conjunctive query filter over entry listings.
pub mod filter;
/// Canonical JSON hashing utilities.
pub mod hashing;
/// Binary Merkle tree construction and inclusion proofs.
pub mod merkle;

pub use chain::AuditChain;
pub use chain::AuditStore;
pub use chain::ChainVerification;
pub use chain::ImmutableAuditEntry;
pub use chain::MerkleProofResult;
pub use error::AuditError;
pub use export::AuditExport;
pub use export::export;
pub use export::verify_export;
pub use filter::AuditFilter;
