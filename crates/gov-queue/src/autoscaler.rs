// crates/gov-queue/src/autoscaler.rs
// ============================================================================
// Module: Auto-scaler
// Description: Depth-and-cooldown driven worker count evaluator (§4.H).
// ============================================================================

//! ## Overview
//! [`AutoScaler`] tracks a worker count and the timestamps of its last
//! scale-up/scale-down actions. `evaluate` is the one entry point: given a
//! queue depth and the current time it returns the worker count to run with
//! next, always clamped to `[min_workers, max_workers]`.

use gov_core::Timestamp;
use tracing::info;

/// Tunables for [`AutoScaler::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingConfig {
    /// The floor worker count never goes below.
    pub min_workers: u32,
    /// The ceiling worker count never exceeds.
    pub max_workers: u32,
    /// Queue depth at or above which a scale-up is considered.
    pub scale_up_threshold: usize,
    /// Queue depth at or below which a scale-down is considered.
    pub scale_down_threshold: usize,
    /// Workers added by a single scale-up action.
    pub scale_up_increment: u32,
    /// Workers removed by a single scale-down action.
    pub scale_down_increment: u32,
    /// Minimum seconds between consecutive scale-up actions.
    pub scale_up_cooldown_secs: i64,
    /// Minimum seconds between consecutive scale-down actions.
    pub scale_down_cooldown_secs: i64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            min_workers: 1,
            max_workers: 5,
            scale_up_threshold: 5,
            scale_down_threshold: 0,
            scale_up_increment: 2,
            scale_down_increment: 1,
            scale_up_cooldown_secs: 60,
            scale_down_cooldown_secs: 120,
        }
    }
}

/// Tracks worker count and last-scaling timestamps, evaluating scale
/// decisions against a [`ScalingConfig`].
#[derive(Debug, Clone)]
pub struct AutoScaler {
    config: ScalingConfig,
    worker_count: u32,
    last_scale_up: Option<Timestamp>,
    last_scale_down: Option<Timestamp>,
}

impl AutoScaler {
    /// Builds an auto-scaler starting at `config.min_workers`.
    #[must_use]
    pub fn new(config: ScalingConfig) -> Self {
        Self {
            worker_count: config.min_workers,
            config,
            last_scale_up: None,
            last_scale_down: None,
        }
    }

    /// Returns the current worker count.
    #[must_use]
    pub fn worker_count(&self) -> u32 {
        self.worker_count
    }

    fn should_scale_up(&self, queue_depth: usize, now: Timestamp) -> bool {
        let past_cooldown = self.last_scale_up.is_none_or(|last| now.unix_timestamp() - last.unix_timestamp() >= self.config.scale_up_cooldown_secs);
        queue_depth >= self.config.scale_up_threshold && self.worker_count < self.config.max_workers && past_cooldown
    }

    fn should_scale_down(&self, queue_depth: usize, now: Timestamp) -> bool {
        let past_cooldown =
            self.last_scale_down.is_none_or(|last| now.unix_timestamp() - last.unix_timestamp() >= self.config.scale_down_cooldown_secs);
        queue_depth <= self.config.scale_down_threshold && self.worker_count > self.config.min_workers && past_cooldown
    }

    /// Evaluates `queue_depth` at `now` and returns the resulting worker
    /// count, clamped to `[min_workers, max_workers]`. A scale-up
    /// takes priority if both directions' conditions somehow hold at once.
    pub fn evaluate(&mut self, queue_depth: usize, now: Timestamp) -> u32 {
        if self.should_scale_up(queue_depth, now) {
            let next = self.worker_count.saturating_add(self.config.scale_up_increment).min(self.config.max_workers);
            info!(from = self.worker_count, to = next, queue_depth, "scaling up worker pool");
            self.worker_count = next;
            self.last_scale_up = Some(now);
        } else if self.should_scale_down(queue_depth, now) {
            let next = self.worker_count.saturating_sub(self.config.scale_down_increment).max(self.config.min_workers);
            info!(from = self.worker_count, to = next, queue_depth, "scaling down worker pool");
            self.worker_count = next;
            self.last_scale_down = Some(now);
        }
        self.worker_count
    }
}

#[cfg(test)]
mod tests {
    use gov_core::Timestamp;

    use super::AutoScaler;
    use super::ScalingConfig;

    #[test]
    fn scales_up_in_increments_until_max_then_holds() {
        let config = ScalingConfig {
            min_workers: 1,
            max_workers: 5,
            scale_up_threshold: 5,
            scale_up_increment: 2,
            scale_up_cooldown_secs: 0,
            ..ScalingConfig::default()
        };
        let mut scaler = AutoScaler::new(config);
        let now = Timestamp::now();

        assert_eq!(scaler.evaluate(10, now), 3);
        assert_eq!(scaler.evaluate(10, now.plus_seconds(1)), 5);
        assert_eq!(scaler.evaluate(10, now.plus_seconds(2)), 5);
    }

    #[test]
    fn cooldown_suppresses_consecutive_scale_ups() {
        let config = ScalingConfig {
            scale_up_threshold: 5,
            scale_up_increment: 1,
            scale_up_cooldown_secs: 60,
            ..ScalingConfig::default()
        };
        let mut scaler = AutoScaler::new(config);
        let now = Timestamp::now();

        assert_eq!(scaler.evaluate(10, now), 2);
        assert_eq!(scaler.evaluate(10, now.plus_seconds(10)), 2);
        assert_eq!(scaler.evaluate(10, now.plus_seconds(61)), 3);
    }

    #[test]
    fn scales_down_but_never_below_min_workers() {
        let config = ScalingConfig {
            min_workers: 1,
            max_workers: 5,
            scale_up_threshold: 1000,
            scale_down_threshold: 0,
            scale_down_increment: 10,
            scale_down_cooldown_secs: 0,
            ..ScalingConfig::default()
        };
        let mut scaler = AutoScaler::new(config);
        let now = Timestamp::now();

        assert_eq!(scaler.evaluate(0, now), 1);
    }

    #[test]
    fn worker_count_stays_within_bounds_across_oscillating_depth() {
        let config = ScalingConfig {
            min_workers: 1,
            max_workers: 4,
            scale_up_threshold: 5,
            scale_down_threshold: 1,
            scale_up_increment: 3,
            scale_down_increment: 3,
            scale_up_cooldown_secs: 0,
            scale_down_cooldown_secs: 0,
        };
        let mut scaler = AutoScaler::new(config);
        let now = Timestamp::now();

        for (index, depth) in [10, 0, 10, 0, 10].into_iter().enumerate() {
            let offset = i64::try_from(index).unwrap_or(i64::MAX);
            let count = scaler.evaluate(depth, now.plus_seconds(offset));
            assert!((1..=4).contains(&count), "worker count {count} left [min, max] at step {index}");
        }
    }
}
