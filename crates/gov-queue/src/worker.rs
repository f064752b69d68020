// crates/gov-queue/src/worker.rs
// ============================================================================
// Module: Worker
// Description: Polls a `QueueBackend` and dispatches messages to registered
//              handlers (§4.H).
// ============================================================================

//! ## Overview
//! A [`Worker`] owns one named queue and a map of [`Handler`]s keyed by
//! `task_type`. `poll_once` receives a batch, runs each message's handler,
//! and deletes the message on success; a handler failure leaves the message
//! for redelivery (and, past `max_receive_count`, dead-lettering) rather
//! than deleting it itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use gov_core::Timestamp;
use serde_json::Value;
use tracing::info;
use tracing::warn;

use crate::backend::QueueBackend;
use crate::error::QueueError;

/// The outcome of handling a single message.
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// The handler completed the task; the message is deleted from the
    /// queue.
    Completed(Value),
    /// The handler failed; the message is left for redelivery.
    Failed(String),
}

/// Executes the work named by a message's `task_type`.
pub trait Handler: Send + Sync {
    /// Handles `body`, returning the outcome to record against the message.
    fn handle(&self, task_type: &str, body: &Value) -> TaskResult;
}

/// The last known outcome of a dispatched message, queryable by id.
#[derive(Debug, Clone)]
struct TaskProgress {
    result: Option<TaskResult>,
}

/// Polls one queue and dispatches its messages to registered [`Handler`]s.
pub struct Worker {
    queue_name: String,
    backend: Arc<dyn QueueBackend>,
    handlers: HashMap<String, Arc<dyn Handler>>,
    progress: Mutex<HashMap<String, TaskProgress>>,
}

impl Worker {
    /// Builds a worker over `queue_name`, with no handlers registered yet.
    #[must_use]
    pub fn new(queue_name: impl Into<String>, backend: Arc<dyn QueueBackend>) -> Self {
        Self {
            queue_name: queue_name.into(),
            backend,
            handlers: HashMap::new(),
            progress: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `handler` to serve messages whose `task_type` is
    /// `task_type`.
    pub fn register_handler(&mut self, task_type: impl Into<String>, handler: Arc<dyn Handler>) {
        self.handlers.insert(task_type.into(), handler);
    }

    /// Receives up to `max` messages and dispatches each to its registered
    /// handler, deleting the message from the backend on success.
    ///
    /// Returns the number of messages dispatched this poll.
    ///
    /// # Errors
    /// Returns [`QueueError`] if the underlying queue does not exist.
    pub fn poll_once(&self, max: usize, now: Timestamp) -> Result<usize, QueueError> {
        let received = self.backend.receive_tasks(&self.queue_name, max, now)?;
        let count = received.len();
        for (receipt, message) in received {
            let outcome = match self.handlers.get(message.task_type.as_str()) {
                Some(handler) => handler.handle(&message.task_type, &message.body),
                None => TaskResult::Failed(format!("no handler registered for task type {}", message.task_type)),
            };
            match &outcome {
                TaskResult::Completed(_) => {
                    info!(message_id = %message.id, task_type = %message.task_type, "task completed");
                    self.backend.delete_task(&self.queue_name, &receipt)?;
                }
                TaskResult::Failed(error) => {
                    warn!(message_id = %message.id, task_type = %message.task_type, error = %error, "task failed, left for redelivery");
                }
            }
            #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
            let mut progress = self.progress.lock().unwrap();
            progress.insert(message.id.clone(), TaskProgress { result: Some(outcome) });
        }
        Ok(count)
    }

    /// Returns whether `task_id` has a recorded outcome yet.
    #[must_use]
    pub fn get_task_progress(&self, task_id: &str) -> bool {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let progress = self.progress.lock().unwrap();
        progress.get(task_id).is_some_and(|entry| entry.result.is_some())
    }

    /// Returns the recorded outcome for `task_id`, if any.
    #[must_use]
    pub fn get_task_result(&self, task_id: &str) -> Option<TaskResult> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let progress = self.progress.lock().unwrap();
        progress.get(task_id).and_then(|entry| entry.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gov_core::Timestamp;
    use serde_json::Value;
    use serde_json::json;

    use super::Handler;
    use super::TaskResult;
    use super::Worker;
    use crate::backend::InMemoryBackend;
    use crate::backend::QueueBackend;
    use crate::message::Priority;
    use crate::message::QueueMessage;

    struct EchoHandler;

    impl Handler for EchoHandler {
        fn handle(&self, _task_type: &str, body: &Value) -> TaskResult {
            TaskResult::Completed(body.clone())
        }
    }

    struct AlwaysFailsHandler;

    impl Handler for AlwaysFailsHandler {
        fn handle(&self, _task_type: &str, _body: &Value) -> TaskResult {
            TaskResult::Failed("synthetic failure".to_string())
        }
    }

    #[test]
    fn successful_handler_deletes_the_message() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.create_queue("q1", 3, 30).unwrap_or_else(|err| panic!("{err}"));
        backend.send_task("q1", QueueMessage::new("m1", "echo", Priority::Normal, json!({"x": 1}))).unwrap_or_else(|err| panic!("{err}"));

        let mut worker = Worker::new("q1", backend.clone());
        worker.register_handler("echo", Arc::new(EchoHandler));

        let now = Timestamp::now();
        let dispatched = worker.poll_once(10, now).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(dispatched, 1);
        assert!(worker.get_task_progress("m1"));
        assert!(matches!(worker.get_task_result("m1"), Some(TaskResult::Completed(_))));

        let stats = backend.get_stats("q1").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(stats.in_flight, 0);
    }

    #[test]
    fn failed_handler_leaves_message_for_redelivery() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.create_queue("q1", 3, 10).unwrap_or_else(|err| panic!("{err}"));
        backend.send_task("q1", QueueMessage::new("m1", "doomed", Priority::Normal, json!({}))).unwrap_or_else(|err| panic!("{err}"));

        let mut worker = Worker::new("q1", backend.clone());
        worker.register_handler("doomed", Arc::new(AlwaysFailsHandler));

        let now = Timestamp::now();
        worker.poll_once(10, now).unwrap_or_else(|err| panic!("{err}"));
        assert!(matches!(worker.get_task_result("m1"), Some(TaskResult::Failed(_))));

        let stats = backend.get_stats("q1").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(stats.in_flight, 1);
    }

    #[test]
    fn message_with_no_registered_handler_is_treated_as_failure() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.create_queue("q1", 3, 10).unwrap_or_else(|err| panic!("{err}"));
        backend.send_task("q1", QueueMessage::new("m1", "unknown", Priority::Normal, json!({}))).unwrap_or_else(|err| panic!("{err}"));

        let worker = Worker::new("q1", backend);
        let now = Timestamp::now();
        worker.poll_once(10, now).unwrap_or_else(|err| panic!("{err}"));
        assert!(matches!(worker.get_task_result("m1"), Some(TaskResult::Failed(_))));
    }
}
