//! Time abstractions for testability.
//!
//! This module provides:
//! - A [`Clock`] trait so webhook freshness checks can run against a
//!   controlled "now" in tests while production uses the system clock.
//! - A [`Sleeper`] trait so the request engine's retry backoff can be
//!   observed (or skipped) in tests instead of waiting in real time.

use std::future::Future;
use std::time::{Duration, SystemTime};

/// Abstraction over system time for testability.
///
/// Implementations provide the current time, allowing tests to inject
/// controlled time values instead of relying on actual system time.
///
/// # Example
///
/// ```
/// use sendpigeon::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Returns the current time as whole seconds relative to the Unix epoch.
    ///
    /// Times before the epoch yield negative values.
    fn unix_seconds(&self) -> i64 {
        let now = self.now();
        now.duration_since(SystemTime::UNIX_EPOCH).map_or_else(
            |e| -i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX),
            |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        )
    }
}

/// Production clock using actual system time.
///
/// This is the default clock implementation that delegates to
/// [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Abstraction over waiting for a duration.
///
/// The request engine awaits a sleeper between attempts. Swapping the
/// implementation lets tests verify backoff schedules without elapsed time.
pub trait Sleeper: Send + Sync {
    /// Completes after `duration` has elapsed (or immediately, for test doubles).
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
///
/// Useful in tests and in callers that want retries without backoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
