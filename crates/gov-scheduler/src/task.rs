// crates/gov-scheduler/src/task.rs
// ============================================================================
// Module: Scheduled Task
// Description: The unit of work the priority heap orders and retries (§4.G).
// ============================================================================

use gov_core::Timestamp;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Priority of a scheduled task; lower numeric value sorts first (ascending).
///
/// Matches the scheduler's `(priority ascending, scheduledTime ascending)`
/// ordering: `Critical` is scheduled ahead of `Low` when both are due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Scheduled ahead of every other priority.
    Critical,
    /// Scheduled ahead of `Normal`/`Low`.
    High,
    /// The default priority.
    Normal,
    /// Scheduled behind every other priority.
    Low,
}

/// Lifecycle status of a [`ScheduledTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledTaskStatus {
    /// Waiting for `scheduled_time` to arrive.
    Pending,
    /// Handed out by `dequeue`, awaiting `complete`/`fail`.
    Dispatched,
    /// Finished successfully.
    Completed,
    /// Exhausted its retry budget.
    Failed,
}

/// A unit of recurring or one-shot scheduled work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Unique identifier.
    pub id: String,
    /// Scheduling priority.
    pub priority: Priority,
    /// Earliest time this task becomes eligible for `dequeue`.
    pub scheduled_time: Timestamp,
    /// Opaque task-specific configuration payload.
    pub config: Value,
    /// Number of times this task has failed and been retried.
    pub retry_count: u32,
    /// Current lifecycle status.
    pub status: ScheduledTaskStatus,
}

impl ScheduledTask {
    /// Builds a new, pending task due at `scheduled_time`.
    #[must_use]
    pub fn new(id: impl Into<String>, priority: Priority, scheduled_time: Timestamp, config: Value) -> Self {
        Self {
            id: id.into(),
            priority,
            scheduled_time,
            config,
            retry_count: 0,
            status: ScheduledTaskStatus::Pending,
        }
    }
}
