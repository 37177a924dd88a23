//! Retry with exponential backoff for recoverable errors
//!
//! A logical call is attempted once and then retried up to `max_retries`
//! times while its normalized error stays retryable. Attempts of one call are
//! strictly sequential: attempt n+1 starts only after attempt n's error is
//! classified and its delay has elapsed.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use super::{sleep_or_shutdown, Shutdown, Sleeper, TokioSleeper};
use crate::error::{ApiError, ErrorKind, Result, SdkError};

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (0 means no retries)
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Upper bound of the exponential part of the delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl fmt::Display for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RetryConfig {{ max_retries: {}, base_delay: {:?}, max_delay: {:?} }}",
            self.max_retries, self.base_delay, self.max_delay
        )
    }
}

/// Whether a normalized error is worth another attempt
///
/// Rate limiting, connection and timeout failures are transient, as is any
/// 5xx status. Every other 4xx is terminal.
pub fn is_retryable(error: &ApiError) -> bool {
    matches!(
        error.kind,
        ErrorKind::RateLimitExceeded | ErrorKind::NetworkError | ErrorKind::TimeoutError
    ) || error.status_code >= 500
}

/// Retry decisions and backoff delays
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy from its configuration
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Get the retry configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Whether a normalized error is worth another attempt
    pub fn is_retryable(&self, error: &ApiError) -> bool {
        is_retryable(error)
    }

    /// Whether the call that failed on `attempt` (0-based) gets another one
    pub fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        attempt < self.config.max_retries && self.is_retryable(error)
    }

    /// `min(base * 2^attempt, max)`, saturating at `max` on overflow
    pub fn backoff_ceiling(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.config.base_delay.checked_mul(factor))
            .map_or(self.config.max_delay, |delay| delay.min(self.config.max_delay))
    }

    /// Delay before retrying after `attempt` failed
    ///
    /// The ceiling plus a uniform jitter of up to 10% of it, never subtracted.
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        let ceiling = self.backoff_ceiling(attempt);
        let jitter = ceiling.mul_f64(rand::thread_rng().gen::<f64>() * 0.1);
        ceiling.saturating_add(jitter)
    }
}

/// Executor for retry operations with exponential backoff
#[derive(Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    shutdown: Shutdown,
}

impl fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("policy", &self.policy)
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}

impl RetryExecutor {
    /// Create a new retry executor sleeping on the tokio timer
    pub fn new(config: RetryConfig) -> Self {
        Self {
            policy: RetryPolicy::new(config),
            sleeper: Arc::new(TokioSleeper),
            shutdown: Shutdown::never(),
        }
    }

    /// Replace the sleeper used for backoff waits
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Abandon backoff waits when this signal fires
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Get the retry policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute an operation, retrying retryable API errors
    ///
    /// The operation receives the 0-based attempt number. Errors other than
    /// `SdkError::Api` are returned immediately.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(SdkError::Api(error)) if self.policy.should_retry(&error, attempt) => {
                    let delay = self.policy.compute_delay(attempt);
                    warn!(
                        kind = %error.kind,
                        status = error.status_code,
                        attempt = attempt + 1,
                        max_retries = self.policy.config().max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed with retryable error, retrying"
                    );

                    sleep_or_shutdown(self.sleeper.as_ref(), delay, &self.shutdown).await?;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
