// SPDX-License-Identifier: GPL-3.0-only

//! Poll pacing for execution units

use std::time::Duration;

use async_trait::async_trait;

/// Fixed-interval polling schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// One status check per second for `seconds` seconds
    pub fn per_second(seconds: u32) -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: seconds,
        }
    }

    /// Total time the policy may spend waiting
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

/// Source of delays for the polling loop
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_second_budget_matches_seconds() {
        let policy = RetryPolicy::per_second(30);
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.budget(), Duration::from_secs(30));
    }

    #[test]
    fn zero_attempts_has_empty_budget() {
        assert_eq!(RetryPolicy::per_second(0).budget(), Duration::ZERO);
    }

    #[tokio::test]
    async fn tokio_clock_returns_after_zero_delay() {
        TokioClock.sleep(Duration::ZERO).await;
    }
}
