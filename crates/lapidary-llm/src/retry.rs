//! Shared retry loop for provider HTTP calls.
//!
//! Providers classify each attempt's outcome as retryable or fatal; the loop
//! here owns the backoff schedule. Throttling (429), server errors (5xx),
//! and transport faults are retried; auth failures and malformed requests
//! surface immediately.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use lapidary_core::{ModelError, ModelResult};

/// Longest single backoff wait.
const MAX_BACKOFF_SECS: u64 = 32;

/// Outcome classification for one provider attempt.
pub(crate) enum Attempt {
    /// Transient fault: retry with backoff until attempts run out, then
    /// surface the wrapped error.
    Retry(ModelError),
    /// Permanent fault: surface immediately, no retry.
    Fatal(ModelError),
}

/// Drive `call` until it succeeds, fails fatally, or exhausts
/// `max_retries` additional attempts. Waits `2^n` seconds (capped at
/// [`MAX_BACKOFF_SECS`]) before the n-th retry.
pub(crate) async fn send_with_backoff<F, Fut>(
    provider: &str,
    max_retries: u32,
    mut call: F,
) -> ModelResult<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, Attempt>>,
{
    let mut retries = 0;
    loop {
        match call().await {
            Ok(text) => return Ok(text),
            Err(Attempt::Fatal(error)) => return Err(error),
            Err(Attempt::Retry(error)) => {
                if retries >= max_retries {
                    warn!(
                        provider,
                        attempts = retries + 1,
                        error = %error,
                        "retries exhausted"
                    );
                    return Err(error);
                }
                retries += 1;
                let delay = backoff_delay(retries);
                debug!(
                    provider,
                    retry = retries,
                    delay_secs = delay.as_secs(),
                    error = %error,
                    "transient provider fault, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Backoff before the n-th retry (1-based): 2s, 4s, 8s, 16s, 32s, 32s, ...
fn backoff_delay(retry: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(retry).min(MAX_BACKOFF_SECS))
}

/// Classify a non-success HTTP status.
pub(crate) fn status_error(status: StatusCode, detail: &str) -> Attempt {
    let message = if detail.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", detail.trim())
    };
    match status {
        StatusCode::TOO_MANY_REQUESTS => Attempt::Retry(ModelError::RateLimited),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Attempt::Fatal(ModelError::Auth(message)),
        status if status.is_server_error() => Attempt::Retry(ModelError::Provider(message)),
        _ => Attempt::Fatal(ModelError::Provider(message)),
    }
}

/// Classify a transport-level failure (no HTTP status available).
pub(crate) fn transport_error(error: reqwest::Error, timeout_secs: u64) -> Attempt {
    if error.is_timeout() {
        Attempt::Retry(ModelError::Timeout(timeout_secs))
    } else {
        Attempt::Retry(ModelError::Provider(format!("request failed: {error}")))
    }
}
