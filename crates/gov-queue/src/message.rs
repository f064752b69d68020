// crates/gov-queue/src/message.rs
// ============================================================================
// Module: Queue Message
// Description: The message envelope `sendTask`/`receiveTasks` exchange (§4.H).
// ============================================================================

use gov_core::Timestamp;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Delivery priority; lower numeric value is delivered first.
///
/// `receiveTasks` must return messages in non-increasing priority:
/// critical before high before normal before low, ties broken by
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Delivered ahead of every other priority.
    Critical,
    /// Delivered ahead of `Normal`/`Low`.
    High,
    /// The default priority.
    Normal,
    /// Delivered behind every other priority.
    Low,
}

/// A task body enqueued onto a queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Unique identifier, stable across redeliveries.
    pub id: String,
    /// The kind of task this message carries, used to route to a [`crate::worker::Handler`].
    pub task_type: String,
    /// Delivery priority.
    pub priority: Priority,
    /// Opaque task-specific payload.
    pub body: Value,
    /// When this message was first enqueued.
    pub enqueued_at: Timestamp,
    /// Seconds after `enqueued_at` before this message becomes visible.
    pub delay_seconds: u64,
}

impl QueueMessage {
    /// Builds a new message with no delivery delay.
    #[must_use]
    pub fn new(id: impl Into<String>, task_type: impl Into<String>, priority: Priority, body: Value) -> Self {
        Self {
            id: id.into(),
            task_type: task_type.into(),
            priority,
            body,
            enqueued_at: Timestamp::now(),
            delay_seconds: 0,
        }
    }

    /// Sets `delay_seconds`, making this message invisible until
    /// `enqueued_at + delay_seconds`.
    #[must_use]
    pub fn with_delay(mut self, delay_seconds: u64) -> Self {
        self.delay_seconds = delay_seconds;
        self
    }

    /// Returns `true` if this message is visible at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: Timestamp) -> bool {
        now >= self.enqueued_at.plus_seconds(i64::try_from(self.delay_seconds).unwrap_or(i64::MAX))
    }
}

/// Approximate statistics for a single queue (§4.H `getStats`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of messages visible and awaiting delivery.
    pub approximate_message_count: usize,
    /// Number of messages currently delivered and awaiting `deleteTask`.
    pub in_flight: usize,
}

/// A message that exhausted `maxReceiveCount` and was moved off the
/// redelivery path instead of being retried forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetterMessage {
    /// The original message body.
    pub message: QueueMessage,
    /// Number of times this message was received before dead-lettering.
    pub receive_count: u32,
    /// The last handler error recorded against this message.
    pub last_error: String,
}
