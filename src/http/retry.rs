//! Retry policy for API requests.

use std::time::Duration;

use http::{HeaderMap, StatusCode, header::RETRY_AFTER};

/// Configuration for the engine's bounded retry loop.
///
/// A call makes at most `max_retries + 1` attempts. Between attempts the
/// engine waits either the server's `Retry-After` hint or an exponential
/// backoff of `base_delay * 2^attempt`, capped at `max_delay`.
///
/// # Defaults
///
/// - `max_retries`: 2 (three attempts in total), never more than 5
/// - `base_delay`: 100 milliseconds
/// - `max_delay`: 10 seconds
///
/// # Example
///
/// ```
/// use sendpigeon::http::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new().with_max_retries(4);
/// assert_eq!(policy.total_attempts(), 5);
/// assert_eq!(policy.delay_for_retry(3), Duration::from_millis(800));
///
/// // Out-of-range values are clamped; negative values mean "default".
/// assert_eq!(RetryPolicy::new().with_max_retries(9).max_retries, 5);
/// assert_eq!(RetryPolicy::new().with_max_retries(-1).max_retries, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt, in `0..=MAX_RETRIES`.
    pub max_retries: u32,

    /// Delay before the first retry; doubled for every following retry.
    pub base_delay: Duration,

    /// Upper bound of the computed backoff.
    ///
    /// `Retry-After` hints from the server are honored as sent and are
    /// not capped.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;

    /// Hard ceiling on the number of retries.
    pub const MAX_RETRIES: u32 = 5;

    /// Default base backoff delay (100 milliseconds).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

    /// Default backoff cap (10 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
        }
    }

    /// Sets the number of retries.
    ///
    /// Negative values select [`Self::DEFAULT_MAX_RETRIES`]; values above
    /// [`Self::MAX_RETRIES`] are clamped to it.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: i64) -> Self {
        self.max_retries = if max_retries < 0 {
            Self::DEFAULT_MAX_RETRIES
        } else {
            u32::try_from(max_retries.min(i64::from(Self::MAX_RETRIES))).unwrap_or(Self::MAX_RETRIES)
        };
        self
    }

    /// Sets the base backoff delay.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the backoff cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Total number of attempts a call may make.
    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Computes the backoff for a given attempt index (0-indexed).
    ///
    /// Attempt `k` waits `base_delay * 2^k`, capped at `max_delay`.
    #[must_use]
    pub fn delay_for_retry(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Returns true if another attempt may follow attempt `attempt` (0-indexed).
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Returns true for statuses worth retrying: 429 and every 5xx.
    #[must_use]
    pub fn is_retryable_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Reads a `Retry-After` header expressed as a positive integer count of seconds.
    ///
    /// HTTP-date values, zero, negative, and malformed values yield `None`
    /// so the caller falls back to computed backoff.
    #[must_use]
    pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
        let seconds = raw.parse::<u64>().ok().filter(|&s| s > 0)?;
        Some(Duration::from_secs(seconds))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
