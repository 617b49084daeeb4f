//! Reconnection Backoff
//!
//! Exponential backoff with additive jitter for WebSocket reconnection.
//! Each scheduled delay is the current backoff level plus a random jitter
//! of up to one base delay, capped at the maximum; the level itself
//! doubles per failure and resets on a successful connection.

use std::time::Duration;

use rand::Rng;

/// Configuration for reconnection backoff.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Initial delay and jitter span.
    pub base_delay: Duration,
    /// Maximum delay between reconnection attempts.
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Backoff policy tracking the current delay level across failures.
#[derive(Debug)]
pub struct BackoffPolicy {
    config: BackoffConfig,
    current_delay: Duration,
}

impl BackoffPolicy {
    /// Create a new backoff policy at its base level.
    #[must_use]
    pub const fn new(config: BackoffConfig) -> Self {
        let current_delay = config.base_delay;
        Self {
            config,
            current_delay,
        }
    }

    /// Get the next delay and advance the level.
    ///
    /// The returned delay is `min(current + jitter, max)` where jitter is
    /// uniform in `[0, base)`; the level then doubles, capped at `max`.
    #[must_use]
    pub fn next_delay(&mut self) -> Duration {
        let jitter = self.sample_jitter();
        self.next_delay_with(jitter)
    }

    /// Reset to the base level after a successful connection.
    pub const fn reset(&mut self) {
        self.current_delay = self.config.base_delay;
    }

    /// Current backoff level, without jitter.
    #[must_use]
    pub const fn current_delay(&self) -> Duration {
        self.current_delay
    }

    fn next_delay_with(&mut self, jitter: Duration) -> Duration {
        let delay = (self.current_delay + jitter).min(self.config.max_delay);
        self.current_delay = (self.current_delay * 2).min(self.config.max_delay);
        delay
    }

    fn sample_jitter(&self) -> Duration {
        let span = self.config.base_delay.as_millis();
        if span == 0 {
            return Duration::ZERO;
        }
        let span_u64 = u64::try_from(span).unwrap_or(u64::MAX);
        Duration::from_millis(rand::rng().random_range(0..span_u64))
    }
}
