//! Bounded retry for the final state-changing write.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Attempts made by [`RetryPolicy::default`].
pub const DEFAULT_ATTEMPTS: usize = 3;

/// Pause between attempts in [`RetryPolicy::default`].
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// How often and how far apart an operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Runs `op` under this policy.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        with_retry(self.attempts, self.delay, op).await
    }
}

/// Runs `op` up to `attempts` times, sleeping `delay` between failures.
///
/// Returns the first success or the last error. At least one attempt is
/// always made.
pub async fn with_retry<T, E, F, Fut>(attempts: usize, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %err, "attempt failed, retrying");
                metrics::counter!("retry_attempts_total").increment(1);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Attempt = std::future::Ready<Result<usize, String>>;

    fn failing_until(calls: Arc<AtomicUsize>, succeed_on: usize) -> impl FnMut() -> Attempt {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= succeed_on {
                std::future::ready(Ok(n))
            } else {
                std::future::ready(Err(format!("failure {n}")))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let result = with_retry(3, DEFAULT_DELAY, failing_until(calls.clone(), 3)).await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_error_when_exhausted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let result = with_retry(3, DEFAULT_DELAY, failing_until(calls.clone(), 10)).await;
        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_between_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let started = tokio::time::Instant::now();
        let _ = with_retry(3, Duration::from_millis(100), failing_until(calls, 10)).await;
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let result = with_retry(0, Duration::ZERO, failing_until(calls.clone(), 1)).await;
        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(100));
    }
}
