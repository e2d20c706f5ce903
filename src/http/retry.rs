//! Retry policies for HTTP requests.

use std::time::Duration;

/// Retry policy for an HTTP request.
///
/// Every POST in this API is non-idempotent (nonce issuance, verification,
/// trade submission), so only the profile GET retries by default.
#[derive(Debug, Clone, Copy, Default)]
pub enum RetryPolicy {
    /// No retries.
    #[default]
    None,
    /// Retry on transport failures + 502/503/504, with backoff on 429.
    Idempotent,
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add jitter to the delay.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl RetryConfig {
    /// The default config for idempotent (GET) requests.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Calculate delay for a given attempt (0-indexed): geometric growth
    /// from `initial_delay`, capped at `max_delay`, then spread by up to
    /// ±25% when jitter is on.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let mut delay = self
            .initial_delay
            .mul_f64(self.backoff_factor.powi(attempt as i32));
        if delay > self.max_delay {
            delay = self.max_delay;
        }
        if self.jitter {
            delay = delay.mul_f64(0.75 + rand::random::<f64>() * 0.5);
        }
        delay
    }
}
