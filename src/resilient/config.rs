use std::time::Duration;

/// Which failures are worth another attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetryOn {
    /// Retry every error, including ones that cannot succeed on retry
    /// (unknown model, bad credentials).
    #[default]
    AnyError,
    /// Stop at the first terminal error; see `GatewayError::is_retryable`.
    Transient,
}

/// Configuration for retry and backoff behavior.
#[derive(Clone, Debug)]
pub struct ResilienceConfig {
    /// Maximum number of attempts including the first one
    pub max_attempts: usize,
    /// Initial backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds
    pub max_delay_ms: u64,
    /// Whether to add random jitter to backoff delays
    pub jitter: bool,
    pub retry_on: RetryOn,
}

const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

impl ResilienceConfig {
    /// Three attempts, backoff from 1s doubling up to 10s, retry on anything.
    pub fn defaults() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            jitter: false,
            retry_on: RetryOn::AnyError,
        }
    }

    /// Builds a policy from user-facing settings (attempt count and base delay
    /// in seconds). The ceiling stays at 10s unless the base exceeds it.
    pub fn from_settings(max_retries: usize, retry_delay_secs: f64) -> Self {
        let base_delay_ms = (retry_delay_secs.max(0.0) * 1_000.0).round() as u64;
        Self {
            max_attempts: max_retries,
            base_delay_ms,
            max_delay_ms: DEFAULT_MAX_DELAY_MS.max(base_delay_ms),
            ..Self::defaults()
        }
    }

    pub fn retry_on(mut self, retry_on: RetryOn) -> Self {
        self.retry_on = retry_on;
        self
    }

    /// Attempts actually made; a zero setting still makes one call.
    pub fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }

    /// Delay slept after the failed attempt at `attempt_index` (0-based),
    /// before jitter.
    pub fn backoff_delay(&self, attempt_index: usize) -> Duration {
        let delay = self
            .base_delay_ms
            .saturating_mul(1u64 << attempt_index.min(16))
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self::defaults()
    }
}
