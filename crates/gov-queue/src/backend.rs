// crates/gov-queue/src/backend.rs
// ============================================================================
// Module: Queue Backend
// Description: The provider-agnostic queue abstraction and its in-memory
//              reference implementation (§4.H).
// ============================================================================

//! ## Overview
//! [`QueueBackend`] is the seam a worker pool drives; [`InMemoryBackend`] is
//! the default reference implementation. A message exceeding its queue's
//! `max_receive_count` is moved to a [`DeadLetterMessage`] instead of being
//! redelivered forever — the queue-side analogue of the scheduler's
//! `fail`-to-`failed` terminal transition.

use std::collections::HashMap;
use std::sync::Mutex;

use gov_core::Timestamp;
use gov_core::identifiers::generate_id;
use tracing::warn;

use crate::error::QueueError;
use crate::message::DeadLetterMessage;
use crate::message::QueueMessage;
use crate::message::QueueStats;

/// Default visibility timeout applied to a received message before it
/// becomes redeliverable again.
pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u64 = 30;

/// Default redelivery budget before a message is dead-lettered.
pub const DEFAULT_MAX_RECEIVE_COUNT: u32 = 5;

/// The provider-agnostic queue operations a worker pool drives.
///
/// Implementations must return messages from `receive_tasks` in
/// non-increasing priority order, ties broken by insertion order.
pub trait QueueBackend: Send + Sync {
    /// Creates `queue` with the given receive/visibility policy.
    ///
    /// # Errors
    /// Returns [`QueueError::QueueAlreadyExists`] if `queue` already exists.
    fn create_queue(&self, queue: &str, max_receive_count: u32, visibility_timeout_secs: u64) -> Result<(), QueueError>;

    /// Deletes `queue` and everything enqueued on it.
    ///
    /// # Errors
    /// Returns [`QueueError::QueueNotFound`] if `queue` does not exist.
    fn delete_queue(&self, queue: &str) -> Result<(), QueueError>;

    /// Enqueues `message` onto `queue`.
    ///
    /// # Errors
    /// Returns [`QueueError::QueueNotFound`] if `queue` does not exist.
    fn send_task(&self, queue: &str, message: QueueMessage) -> Result<(), QueueError>;

    /// Receives up to `max` visible messages from `queue`, each paired with
    /// a receipt handle; reclaims any in-flight messages whose visibility
    /// timeout has elapsed first, dead-lettering those past their receive
    /// budget.
    ///
    /// # Errors
    /// Returns [`QueueError::QueueNotFound`] if `queue` does not exist.
    fn receive_tasks(&self, queue: &str, max: usize, now: Timestamp) -> Result<Vec<(String, QueueMessage)>, QueueError>;

    /// Permanently removes the in-flight message identified by `receipt`.
    ///
    /// # Errors
    /// Returns [`QueueError::QueueNotFound`] or
    /// [`QueueError::ReceiptNotFound`].
    fn delete_task(&self, queue: &str, receipt: &str) -> Result<(), QueueError>;

    /// Returns approximate visible/in-flight counts for `queue`.
    ///
    /// # Errors
    /// Returns [`QueueError::QueueNotFound`] if `queue` does not exist.
    fn get_stats(&self, queue: &str) -> Result<QueueStats, QueueError>;

    /// Returns dead-lettered messages accumulated for `queue`.
    ///
    /// # Errors
    /// Returns [`QueueError::QueueNotFound`] if `queue` does not exist.
    fn dead_letters(&self, queue: &str) -> Result<Vec<DeadLetterMessage>, QueueError>;
}

/// A message awaiting delivery, tagged with the order it arrived in so ties
/// within a priority band break by insertion order.
#[derive(Debug, Clone)]
struct Enqueued {
    seq: u64,
    message: QueueMessage,
    receive_count: u32,
}

/// A message currently delivered to a worker and awaiting `delete_task`.
#[derive(Debug, Clone)]
struct InFlight {
    enqueued: Enqueued,
    visible_at: Timestamp,
}

#[derive(Debug, Default)]
struct QueueState {
    visible: Vec<Enqueued>,
    in_flight: HashMap<String, InFlight>,
    dead_letters: Vec<DeadLetterMessage>,
    next_seq: u64,
    max_receive_count: u32,
    visibility_timeout_secs: u64,
}

impl QueueState {
    /// Moves any in-flight message past its visibility timeout back to
    /// `visible`, dead-lettering it instead if it has also exhausted
    /// `max_receive_count`.
    fn reclaim_expired(&mut self, now: Timestamp) {
        let expired: Vec<String> = self
            .in_flight
            .iter()
            .filter(|(_, in_flight)| in_flight.visible_at <= now)
            .map(|(receipt, _)| receipt.clone())
            .collect();
        for receipt in expired {
            let Some(in_flight) = self.in_flight.remove(&receipt) else { continue };
            if in_flight.enqueued.receive_count >= self.max_receive_count {
                warn!(message_id = %in_flight.enqueued.message.id, receive_count = in_flight.enqueued.receive_count, "message exceeded max receive count, dead-lettering");
                self.dead_letters.push(DeadLetterMessage {
                    message: in_flight.enqueued.message,
                    receive_count: in_flight.enqueued.receive_count,
                    last_error: "visibility timeout elapsed without acknowledgement".to_string(),
                });
            } else {
                self.visible.push(in_flight.enqueued);
            }
        }
    }
}

/// The default, in-process reference [`QueueBackend`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    queues: Mutex<HashMap<String, QueueState>>,
}

impl InMemoryBackend {
    /// Builds an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against `queue`'s state, failing if it was never created.
    fn with_queue<R>(&self, queue: &str, f: impl FnOnce(&mut QueueState) -> R) -> Result<R, QueueError> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut queues = self.queues.lock().unwrap();
        let state = queues.get_mut(queue).ok_or_else(|| QueueError::QueueNotFound(queue.to_string()))?;
        Ok(f(state))
    }
}

impl QueueBackend for InMemoryBackend {
    fn create_queue(&self, queue: &str, max_receive_count: u32, visibility_timeout_secs: u64) -> Result<(), QueueError> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut queues = self.queues.lock().unwrap();
        if queues.contains_key(queue) {
            return Err(QueueError::QueueAlreadyExists(queue.to_string()));
        }
        queues.insert(
            queue.to_string(),
            QueueState {
                max_receive_count,
                visibility_timeout_secs,
                ..QueueState::default()
            },
        );
        Ok(())
    }

    fn delete_queue(&self, queue: &str) -> Result<(), QueueError> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut queues = self.queues.lock().unwrap();
        queues.remove(queue).map(|_| ()).ok_or_else(|| QueueError::QueueNotFound(queue.to_string()))
    }

    fn send_task(&self, queue: &str, message: QueueMessage) -> Result<(), QueueError> {
        self.with_queue(queue, |state| {
            let seq = state.next_seq;
            state.next_seq += 1;
            state.visible.push(Enqueued { seq, message, receive_count: 0 });
        })
    }

    fn receive_tasks(&self, queue: &str, max: usize, now: Timestamp) -> Result<Vec<(String, QueueMessage)>, QueueError> {
        self.with_queue(queue, |state| {
            state.reclaim_expired(now);

            let mut candidates: Vec<usize> = state
                .visible
                .iter()
                .enumerate()
                .filter(|(_, enqueued)| enqueued.message.is_visible_at(now))
                .map(|(index, _)| index)
                .collect();
            candidates.sort_by(|&a, &b| {
                let left = &state.visible[a];
                let right = &state.visible[b];
                left.message.priority.cmp(&right.message.priority).then_with(|| left.seq.cmp(&right.seq))
            });
            candidates.truncate(max);

            let mut delivered = Vec::with_capacity(candidates.len());
            for index in candidates.into_iter().rev() {
                let mut enqueued = state.visible.remove(index);
                enqueued.receive_count += 1;
                let receipt = generate_id();
                let visible_at = now.plus_seconds(i64::try_from(state.visibility_timeout_secs).unwrap_or(i64::MAX));
                delivered.push((receipt.clone(), enqueued.message.clone()));
                state.in_flight.insert(receipt, InFlight { enqueued, visible_at });
            }
            delivered.reverse();
            delivered
        })
    }

    fn delete_task(&self, queue: &str, receipt: &str) -> Result<(), QueueError> {
        self.with_queue(queue, |state| {
            state.in_flight.remove(receipt).map(|_| ()).ok_or_else(|| QueueError::ReceiptNotFound(receipt.to_string()))
        })?
    }

    fn get_stats(&self, queue: &str) -> Result<QueueStats, QueueError> {
        self.with_queue(queue, |state| QueueStats {
            approximate_message_count: state.visible.len(),
            in_flight: state.in_flight.len(),
        })
    }

    fn dead_letters(&self, queue: &str) -> Result<Vec<DeadLetterMessage>, QueueError> {
        self.with_queue(queue, |state| state.dead_letters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryBackend;
    use super::QueueBackend;
    use crate::message::Priority;
    use crate::message::QueueMessage;
    use gov_core::Timestamp;
    use serde_json::json;

    fn backend() -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend.create_queue("q1", 3, 30).unwrap_or_else(|err| panic!("{err}"));
        backend
    }

    #[test]
    fn receive_returns_messages_in_priority_order() {
        let backend = backend();
        let now = Timestamp::now();
        backend.send_task("q1", QueueMessage::new("m1", "t", Priority::Low, json!({}))).unwrap_or_else(|err| panic!("{err}"));
        backend.send_task("q1", QueueMessage::new("m2", "t", Priority::Critical, json!({}))).unwrap_or_else(|err| panic!("{err}"));
        backend.send_task("q1", QueueMessage::new("m3", "t", Priority::Normal, json!({}))).unwrap_or_else(|err| panic!("{err}"));

        let received = backend.receive_tasks("q1", 10, now).unwrap_or_else(|err| panic!("{err}"));
        let ids: Vec<&str> = received.iter().map(|(_, msg)| msg.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m3", "m1"]);
    }

    #[test]
    fn ties_within_a_priority_break_by_insertion_order() {
        let backend = backend();
        let now = Timestamp::now();
        backend.send_task("q1", QueueMessage::new("first", "t", Priority::Normal, json!({}))).unwrap_or_else(|err| panic!("{err}"));
        backend.send_task("q1", QueueMessage::new("second", "t", Priority::Normal, json!({}))).unwrap_or_else(|err| panic!("{err}"));

        let received = backend.receive_tasks("q1", 10, now).unwrap_or_else(|err| panic!("{err}"));
        let ids: Vec<&str> = received.iter().map(|(_, msg)| msg.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn delayed_message_is_invisible_until_its_delay_elapses() {
        let backend = backend();
        let now = Timestamp::now();
        backend
            .send_task("q1", QueueMessage::new("delayed", "t", Priority::Critical, json!({})).with_delay(3600))
            .unwrap_or_else(|err| panic!("{err}"));

        let received = backend.receive_tasks("q1", 10, now).unwrap_or_else(|err| panic!("{err}"));
        assert!(received.is_empty());

        let later = now.plus_seconds(3601);
        let received = backend.receive_tasks("q1", 10, later).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(received.len(), 1);
    }

    #[test]
    fn delete_task_removes_from_in_flight_and_stats() {
        let backend = backend();
        let now = Timestamp::now();
        backend.send_task("q1", QueueMessage::new("m1", "t", Priority::Normal, json!({}))).unwrap_or_else(|err| panic!("{err}"));
        let received = backend.receive_tasks("q1", 1, now).unwrap_or_else(|err| panic!("{err}"));
        let (receipt, _) = &received[0];
        backend.delete_task("q1", receipt).unwrap_or_else(|err| panic!("{err}"));

        let stats = backend.get_stats("q1").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(stats.approximate_message_count, 0);
        assert_eq!(stats.in_flight, 0);
    }

    #[test]
    fn message_exceeding_max_receive_count_is_dead_lettered() {
        let backend = InMemoryBackend::new();
        backend.create_queue("q1", 1, 10).unwrap_or_else(|err| panic!("{err}"));
        let now = Timestamp::now();
        backend.send_task("q1", QueueMessage::new("m1", "t", Priority::Normal, json!({}))).unwrap_or_else(|err| panic!("{err}"));

        backend.receive_tasks("q1", 10, now).unwrap_or_else(|err| panic!("{err}"));
        let after_timeout = now.plus_seconds(20);
        backend.receive_tasks("q1", 10, after_timeout).unwrap_or_else(|err| panic!("{err}"));
        let after_second_timeout = after_timeout.plus_seconds(20);
        let received = backend.receive_tasks("q1", 10, after_second_timeout).unwrap_or_else(|err| panic!("{err}"));
        assert!(received.is_empty());

        let dead_letters = backend.dead_letters("q1").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(dead_letters.len(), 1);
        assert_eq!(dead_letters[0].message.id, "m1");
    }
}
