//! Flood-control retry policy.

use std::time::Duration;

use crate::errors::PlatformStatusError;

/// When to repeat a request the platform rejected.
///
/// Only `429 Too Many Requests` responses that name a `retry_after` no larger
/// than `max_retry_after` are retried, at most `max_retries` times. The
/// default never retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            max_retry_after: Duration::ZERO,
        }
    }

    pub const fn flood_control(max_retries: u32, max_retry_after: Duration) -> Self {
        Self {
            max_retries,
            max_retry_after,
        }
    }

    /// How long to wait before attempt `attempts + 1`, or `None` to give up.
    pub fn delay_for(&self, err: &PlatformStatusError, attempts: u32) -> Option<Duration> {
        if attempts >= self.max_retries {
            return None;
        }
        let too_many = err.status == 429 || err.error_code == Some(429);
        if !too_many {
            return None;
        }
        let wait = Duration::from_secs(err.retry_after?);
        (wait <= self.max_retry_after).then_some(wait)
    }
}
