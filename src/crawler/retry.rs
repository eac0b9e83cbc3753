//! Bounded retry with a fixed back-off.
//!
//! [`retry_fixed`] runs a fallible async operation up to `max_attempts` times,
//! sleeping a constant `backoff` between failed attempts. Every failure is
//! logged with its attempt number. The last error is returned once attempts
//! run out; there is no sleep after the final attempt.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Runs `operation` until it succeeds or `max_attempts` attempts have failed.
///
/// `label` identifies the operation in log lines (typically the URL).
/// A `max_attempts` of zero is treated as one.
pub async fn retry_fixed<T, E, F, Fut>(
    label: &str,
    max_attempts: u32,
    backoff: Duration,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::error!(
                    target_url = label,
                    attempt,
                    max_attempts,
                    error = %err,
                    "Fetch attempt failed"
                );
                if attempt >= max_attempts {
                    return Err(err);
                }
                attempt += 1;
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}
