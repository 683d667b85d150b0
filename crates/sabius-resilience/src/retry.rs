// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry an async operation with exponential backoff, then give up.

use std::future::Future;

use sabius_core::SabiusError;
use tracing::{error, warn};

use crate::backoff::BackoffPolicy;

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are exhausted.
///
/// `op` receives the one-based attempt number. Only errors for which
/// [`SabiusError::is_retryable`] holds are retried; the delay between
/// attempts follows [`BackoffPolicy::delay_for`]. The last error is
/// returned when every attempt fails.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, SabiusError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, SabiusError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < attempts => {
                let delay = policy.delay_for(attempt - 1);
                warn!(
                    operation,
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    error!(operation, attempts, error = %e, "giving up after retries");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;

    fn policy(max_attempts: u32) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts,
            ..BackoffPolicy::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&policy(3), "create model", move |attempt| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 {
                    Err(SabiusError::connection("refused"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_with_last_error() {
        let start = Instant::now();
        let result: Result<(), _> = retry_with_backoff(&policy(3), "create model", |attempt| async move {
            Err(SabiusError::connection(format!("refused #{attempt}")))
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "connection error: refused #3");
        // No sleep after the final attempt.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<(), _> = retry_with_backoff(&policy(5), "start session", move |_| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(SabiusError::session("bad instructions"))
            }
        })
        .await;

        assert!(matches!(result, Err(SabiusError::Session { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    #[tracing_test::traced_test]
    async fn logs_each_retry() {
        let _: Result<(), _> = retry_with_backoff(&policy(2), "create model", |_| async {
            Err(SabiusError::connection("refused"))
        })
        .await;
        assert!(logs_contain("retrying after transient error"));
        assert!(logs_contain("giving up after retries"));
    }
}
