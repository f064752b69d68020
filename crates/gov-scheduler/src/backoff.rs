// crates/gov-scheduler/src/backoff.rs
// ============================================================================
// Module: Retry Backoff
// Description: Exponential backoff with an optional jitter factor (§4.G).
// ============================================================================

use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

/// Retry policy applied by [`crate::scheduler::Scheduler::fail`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Number of times a task may be retried before it is marked `failed`.
    pub max_retries: u32,
    /// Base delay, in seconds, for the exponential backoff curve.
    pub base_delay_secs: u64,
    /// Upper bound on the computed delay, in seconds.
    pub max_delay_secs: u64,
    /// If `true`, multiply the computed delay by a factor sampled uniformly
    /// from `[0.5, 1.5]` to avoid synchronized retries across tasks.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_secs: 1,
            max_delay_secs: 300,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Computes `backoff(n) = min(base * 2^n, maxDelay)`, optionally scaled
    /// by a `[0.5, 1.5]` jitter factor.
    #[must_use]
    pub fn delay_for_retry(&self, retry_count: u32) -> u64 {
        let exponent = retry_count.min(63);
        let exponential = self.base_delay_secs.saturating_mul(1u64 << exponent);
        let capped = exponential.min(self.max_delay_secs);
        if self.jitter {
            #[allow(clippy::cast_possible_truncation, reason = "jittered delay is already capped at max_delay_secs, far below u64::MAX")]
            let jittered = (capped as f64) * rand::thread_rng().gen_range(0.5..=1.5);
            #[allow(clippy::cast_sign_loss, reason = "jittered is the product of non-negative factors")]
            let jittered = jittered as u64;
            jittered
        } else {
            capped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RetryPolicy;

    #[test]
    fn delay_grows_exponentially_without_jitter() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay_secs: 2,
            max_delay_secs: 1000,
            jitter: false,
        };
        assert_eq!(policy.delay_for_retry(0), 2);
        assert_eq!(policy.delay_for_retry(1), 4);
        assert_eq!(policy.delay_for_retry(2), 8);
    }

    #[test]
    fn delay_is_capped_at_max_delay() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay_secs: 1,
            max_delay_secs: 50,
            jitter: false,
        };
        assert_eq!(policy.delay_for_retry(20), 50);
    }

    #[test]
    fn jitter_stays_within_the_half_to_one_and_half_band() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay_secs: 10,
            max_delay_secs: 10,
            jitter: true,
        };
        for _ in 0..50 {
            let delay = policy.delay_for_retry(0);
            assert!((5..=15).contains(&delay), "delay {delay} out of jitter band");
        }
    }
}
