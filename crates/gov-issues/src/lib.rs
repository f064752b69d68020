// crates/gov-issues/src/lib.rs
// ============================================================================
// Crate: gov-issues
// Description: Severity-indexed issue store, escalation ladder, and the
//              four-eyes resolution gate.
// ============================================================================

//! # gov-issues
//!
//! Component E of the governance core (§4.E). Depends on `gov-core` for
//! storage and `gov-audit` for the trail every state-changing command emits
//! into.

/// Failure kinds the issue manager can produce.
pub mod error;
/// The issue lifecycle coordinator.
pub mod manager;

pub use error::IssueError;
pub use manager::IssueManager;
