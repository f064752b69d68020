// crates/gov-core/src/lib.rs
// ============================================================================
// Crate: gov-core
// Description: Domain model, repository abstraction, tenant context, and
//              identity verification shared by every governance subsystem.
// ============================================================================

//! # gov-core
//!
//! The foundation crate of the governance core: immutable domain value types
//! (component A), the [`repository::Repository`] storage seam (component B),
//! ambient [`context::TenantContext`] (component J), and the crate-spanning
//! [`error::GovernanceError`] every subsystem converts into at its boundary.
//!
//! Subsystem crates (`gov-audit`, `gov-workflow`, `gov-issues`, `gov-dq`,
//! `gov-scheduler`, `gov-queue`, `gov-metering`) depend on this crate for
//! shared types but never on each other directly.

/// Ambient tenant/session/actor context threaded through every operation.
pub mod context;
/// Domain value types for every governance entity family.
pub mod domain;
/// The crate-spanning governance error enum.
pub mod error;
/// Opaque identifier newtypes.
pub mod identifiers;
/// Access-token verification for privileged commands.
pub mod identity;
/// The repository storage abstraction and in-memory reference implementation.
pub mod repository;
/// UTC timestamp newtype.
pub mod time;

pub use context::ActorType;
pub use context::TenantContext;
pub use error::GovernanceError;
pub use identifiers::generate_id;
pub use repository::InMemoryRepository;
pub use repository::Repository;
pub use repository::RepositorySnapshot;
pub use time::Timestamp;
