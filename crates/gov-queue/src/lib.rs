// crates/gov-queue/src/lib.rs
// ============================================================================
// Crate: gov-queue
// Description: Provider-agnostic task queue, worker pool, and auto-scaler
//              (component H).
// ============================================================================

//! # gov-queue
//!
//! A priority-ordered, provider-agnostic task queue. [`backend::QueueBackend`]
//! is the seam a real SQS-style adapter would sit behind (see the
//! `sqs_compatible` feature); [`backend::InMemoryBackend`] is the default.
//! [`worker::Worker`] polls a backend and dispatches to registered
//! [`worker::Handler`]s; [`autoscaler::AutoScaler`] evaluates worker count
//! from queue depth. Has no dependency on `gov-scheduler` — the two crates
//! each carry their own small `Priority` enum rather than share one across
//! subsystems.

/// The queue backend trait and its in-memory reference implementation.
pub mod backend;
/// Auto-scaler evaluating worker count from queue depth and cooldowns.
pub mod autoscaler;
/// Failure kinds produced by this crate.
pub mod error;
/// The message envelope and its priority/dead-letter types.
pub mod message;
/// Worker polling loop and handler dispatch.
pub mod worker;

pub use autoscaler::AutoScaler;
pub use autoscaler::ScalingConfig;
pub use backend::InMemoryBackend;
pub use backend::QueueBackend;
pub use error::QueueError;
pub use message::DeadLetterMessage;
pub use message::Priority;
pub use message::QueueMessage;
pub use message::QueueStats;
pub use worker::Handler;
pub use worker::TaskResult;
pub use worker::Worker;
