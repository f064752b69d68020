// crates/gov-scheduler/src/scheduler.rs
// ============================================================================
// Module: Scheduler
// Description: The priority heap of `ScheduledTask`s and its lifecycle
//              commands (§4.G).
// ============================================================================

//! ## Overview
//! [`Scheduler`] orders pending tasks by `(priority ascending, scheduledTime
//! ascending)` regardless of insertion order, backed by a `BinaryHeap` of a
//! lightweight [`HeapKey`] with the task bodies held separately in a map —
//! the same separate-ordering-key-from-payload shape `gov-queue` reuses for
//! its own priority ordering.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashMap;
use std::sync::Mutex;

use gov_core::Timestamp;
use tracing::info;
use tracing::warn;

use crate::backoff::RetryPolicy;
use crate::error::SchedulerError;
use crate::task::Priority;
use crate::task::ScheduledTask;
use crate::task::ScheduledTaskStatus;

/// The heap ordering key for a pending task: `priority` ascending, then
/// `scheduled_time` ascending, ties broken by `id` for a total order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeapKey {
    priority: Priority,
    scheduled_time: Timestamp,
    id: String,
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.scheduled_time.cmp(&other.scheduled_time))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mutable scheduler state guarded by a single mutex (§5: one cycle/queue's
/// worth of ordering state behind one lock is sufficient here since the
/// heap itself is the only shared resource).
#[derive(Debug, Default)]
struct SchedulerState {
    heap: BinaryHeap<Reverse<HeapKey>>,
    tasks: HashMap<String, ScheduledTask>,
}

/// A priority heap of [`ScheduledTask`]s with retry-with-backoff on failure.
#[derive(Debug)]
pub struct Scheduler {
    state: Mutex<SchedulerState>,
    retry_policy: RetryPolicy,
}

impl Scheduler {
    /// Builds an empty scheduler governed by `retry_policy`.
    #[must_use]
    pub fn new(retry_policy: RetryPolicy) -> Self {
        Self {
            state: Mutex::new(SchedulerState::default()),
            retry_policy,
        }
    }

    /// Registers `task`, making it eligible for `dequeue` once its
    /// `scheduled_time` arrives. The `addSchedule` and `enqueue` commands
    /// are the same underlying operation here: `addSchedule` is the name
    /// used for first-time registration, `enqueue` for re-pushing a task
    /// already known to the scheduler (e.g. from `fail`'s retry path).
    pub fn add_schedule(&self, task: ScheduledTask) {
        self.enqueue(task);
    }

    /// Pushes `task` onto the heap under its current priority/schedule.
    pub fn enqueue(&self, task: ScheduledTask) {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut state = self.state.lock().unwrap();
        let key = HeapKey {
            priority: task.priority,
            scheduled_time: task.scheduled_time,
            id: task.id.clone(),
        };
        state.heap.push(Reverse(key));
        state.tasks.insert(task.id.clone(), task);
    }

    /// Returns the next task that would be dequeued, without removing it or
    /// requiring its `scheduled_time` to have arrived yet.
    #[must_use]
    pub fn peek(&self) -> Option<ScheduledTask> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        let Reverse(key) = state.heap.peek()?;
        state.tasks.get(&key.id).cloned()
    }

    /// Removes and returns the next task whose `scheduled_time` is at or
    /// before `now`, marking it `Dispatched`. Returns `None` if the heap is
    /// empty or the next task is not yet due.
    pub fn dequeue(&self, now: Timestamp) -> Option<ScheduledTask> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut state = self.state.lock().unwrap();
        let Reverse(key) = state.heap.peek()?;
        if key.scheduled_time > now {
            return None;
        }
        #[allow(clippy::unwrap_used, reason = "just confirmed non-empty via peek above")]
        let Reverse(key) = state.heap.pop().unwrap();
        let mut task = state.tasks.remove(&key.id)?;
        task.status = ScheduledTaskStatus::Dispatched;
        state.tasks.insert(task.id.clone(), task.clone());
        Some(task)
    }

    /// Marks `task_id` as completed and removes it from the scheduler.
    ///
    /// # Errors
    /// Returns [`SchedulerError::NotFound`] if `task_id` is unknown.
    pub fn complete(&self, task_id: &str) -> Result<(), SchedulerError> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut state = self.state.lock().unwrap();
        let mut task = state.tasks.remove(task_id).ok_or_else(|| SchedulerError::NotFound(task_id.to_string()))?;
        task.status = ScheduledTaskStatus::Completed;
        info!(task_id, "scheduled task completed");
        Ok(())
    }

    /// Records a failure of `task_id` with `error`. Increments `retryCount`;
    /// if it remains within the retry budget, re-pushes the task with
    /// `scheduledTime = now + backoff(retryCount)`. Otherwise marks it
    /// `failed` and drops it from the scheduler.
    ///
    /// # Errors
    /// Returns [`SchedulerError::NotFound`] if `task_id` is unknown.
    pub fn fail(&self, task_id: &str, error: &str, now: Timestamp) -> Result<ScheduledTaskStatus, SchedulerError> {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let mut state = self.state.lock().unwrap();
        let mut task = state.tasks.remove(task_id).ok_or_else(|| SchedulerError::NotFound(task_id.to_string()))?;
        task.retry_count += 1;

        if task.retry_count <= self.retry_policy.max_retries {
            let delay = self.retry_policy.delay_for_retry(task.retry_count);
            task.scheduled_time = now.plus_seconds(i64::try_from(delay).unwrap_or(i64::MAX));
            task.status = ScheduledTaskStatus::Pending;
            let key = HeapKey {
                priority: task.priority,
                scheduled_time: task.scheduled_time,
                id: task.id.clone(),
            };
            state.heap.push(Reverse(key));
            state.tasks.insert(task.id.clone(), task.clone());
            warn!(task_id, retry_count = task.retry_count, delay_secs = delay, %error, "scheduled task failed, retrying");
            Ok(ScheduledTaskStatus::Pending)
        } else {
            warn!(task_id, retry_count = task.retry_count, %error, "scheduled task exhausted its retry budget");
            Ok(ScheduledTaskStatus::Failed)
        }
    }

    /// Returns the number of tasks currently tracked, pending or dispatched.
    #[must_use]
    pub fn len(&self) -> usize {
        #[allow(clippy::unwrap_used, reason = "poisoned mutex indicates a prior panic; unrecoverable here")]
        let state = self.state.lock().unwrap();
        state.tasks.len()
    }

    /// Returns `true` if no tasks are currently tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use crate::backoff::RetryPolicy;
    use crate::task::Priority;
    use crate::task::ScheduledTask;
    use crate::task::ScheduledTaskStatus;
    use gov_core::Timestamp;
    use serde_json::json;

    fn task(id: &str, priority: Priority, due: Timestamp) -> ScheduledTask {
        ScheduledTask::new(id, priority, due, json!({}))
    }

    #[test]
    fn dequeue_respects_priority_before_schedule_time() {
        let scheduler = Scheduler::new(RetryPolicy::default());
        let now = Timestamp::now();
        scheduler.add_schedule(task("low", Priority::Low, now));
        scheduler.add_schedule(task("critical", Priority::Critical, now));
        scheduler.add_schedule(task("normal", Priority::Normal, now));

        let first = scheduler.dequeue(now).unwrap_or_else(|| panic!("expected a task"));
        assert_eq!(first.id, "critical");
    }

    #[test]
    fn dequeue_returns_none_when_next_task_is_not_yet_due() {
        let scheduler = Scheduler::new(RetryPolicy::default());
        let now = Timestamp::now();
        scheduler.add_schedule(task("future", Priority::Normal, now.plus_seconds(3600)));
        assert!(scheduler.dequeue(now).is_none());
    }

    #[test]
    fn peek_does_not_remove() {
        let scheduler = Scheduler::new(RetryPolicy::default());
        let now = Timestamp::now();
        scheduler.add_schedule(task("t1", Priority::Normal, now));
        assert!(scheduler.peek().is_some());
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn fail_within_budget_reschedules_into_the_future() {
        let scheduler = Scheduler::new(RetryPolicy {
            max_retries: 3,
            base_delay_secs: 10,
            max_delay_secs: 1000,
            jitter: false,
        });
        let now = Timestamp::now();
        scheduler.add_schedule(task("t1", Priority::Normal, now));
        scheduler.dequeue(now).unwrap_or_else(|| panic!("expected a task"));

        let status = scheduler.fail("t1", "handler timed out", now).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(status, ScheduledTaskStatus::Pending);
        assert!(scheduler.dequeue(now).is_none());
        assert!(scheduler.dequeue(now.plus_seconds(20)).is_some());
    }

    #[test]
    fn fail_beyond_budget_marks_failed_and_drops_task() {
        let scheduler = Scheduler::new(RetryPolicy {
            max_retries: 0,
            base_delay_secs: 1,
            max_delay_secs: 10,
            jitter: false,
        });
        let now = Timestamp::now();
        scheduler.add_schedule(task("t1", Priority::Normal, now));
        scheduler.dequeue(now).unwrap_or_else(|| panic!("expected a task"));

        let status = scheduler.fail("t1", "permanent failure", now).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(status, ScheduledTaskStatus::Failed);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn complete_removes_the_task() {
        let scheduler = Scheduler::new(RetryPolicy::default());
        let now = Timestamp::now();
        scheduler.add_schedule(task("t1", Priority::Normal, now));
        scheduler.dequeue(now).unwrap_or_else(|| panic!("expected a task"));
        scheduler.complete("t1").unwrap_or_else(|err| panic!("{err}"));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn complete_unknown_task_is_not_found() {
        let scheduler = Scheduler::new(RetryPolicy::default());
        assert!(scheduler.complete("missing").is_err());
    }
}
