//! Retry utilities for rate-limited operations.
//!
//! The client itself never retries; failures surface to the caller with the
//! API's original detail. Callers that want resilience (the CLI does) layer
//! [`with_retry`] over an operation and decide what counts as retryable,
//! typically [`crate::error::is_rate_limit_error`].

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

/// Initial backoff delay.
const INITIAL_BACKOFF_MS: u64 = 1_000;
/// Maximum backoff delay.
const MAX_BACKOFF_MS: u64 = 60_000;
/// Maximum retry attempts.
const MAX_RETRIES: usize = 5;

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            max_retries: MAX_RETRIES,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(min_delay: Duration, max_delay: Duration, max_retries: usize) -> Self {
        Self {
            min_delay,
            max_delay,
            max_retries,
            with_jitter: true,
        }
    }

    /// Set whether to use jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.with_jitter = jitter;
        self
    }

    /// Build an exponential backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// Build the default exponential backoff strategy: 1s initial delay, 60s
/// ceiling, 5 attempts, jitter enabled.
#[must_use]
pub fn default_backoff() -> ExponentialBuilder {
    RetryConfig::default().into_backoff()
}

/// Execute an operation, retrying errors the predicate accepts.
///
/// Uses exponential backoff with jitter and logs each retry at debug level.
/// `what` names the operation for those log lines.
///
/// # Example
///
/// ```ignore
/// use attest::error::is_rate_limit_error;
/// use attest::retry::with_retry;
///
/// let run = with_retry(
///     || client.create(&addr, &new_run),
///     is_rate_limit_error,
///     "create check run",
/// )
/// .await?;
/// ```
pub async fn with_retry<T, E, F, Fut, IsRetryable>(
    mut operation: F,
    is_retryable: IsRetryable,
    what: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
    IsRetryable: Fn(&E) -> bool + Send + Sync + 'static,
{
    let what = what.to_string();

    // Track attempt number for the retry log lines
    let attempt = AtomicU32::new(0);

    let retry_op = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    retry_op
        .retry(default_backoff())
        .notify(|err, dur| {
            tracing::debug!(
                "Retrying {} in {:?} (attempt {}): {}",
                what,
                dur,
                attempt.load(Ordering::SeqCst),
                err
            );
        })
        .when(is_retryable)
        .await
}
