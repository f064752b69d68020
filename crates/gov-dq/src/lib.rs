// crates/gov-dq/src/lib.rs
// ============================================================================
// Crate: gov-dq
// Description: Deterministic CDE criticality scoring, threshold-based
//              inventory inclusion, and per-dimension DQ rule generation.
// ============================================================================

//! # gov-dq
//!
//! Component F of the governance core (§4.F). Every operation here is a pure
//! function invoked by the command surface against domain types owned by
//! `gov-core`; this crate never touches the repository or audit chain
//! itself.

/// Threshold-gated inventory construction.
pub mod inventory;
/// Per-dimension DQ rule generation.
pub mod rules;
/// Deterministic criticality scoring.
pub mod scoring;

pub use inventory::generate_cde_inventory;
pub use rules::generate_dq_rules;
pub use scoring::ScoringInput;
pub use scoring::score_elements;
