//! Bounded retry for idempotent provider calls.
//!
//! Only calls that can be safely repeated go through here: label-store
//! bootstrap embedding and image generation. Session-mutating LLM calls
//! are never retried.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::defaults::{RETRY_BASE_DELAY_MS, RETRY_MAX_ATTEMPTS};
use crate::error::{Error, Result};

/// Deterministic failures are surfaced immediately; only transient
/// provider trouble earns another attempt.
fn is_retryable(error: &Error) -> bool {
    matches!(
        error,
        Error::Upstream(_) | Error::Timeout(_) | Error::Io(_)
    )
}

/// Runs `call` up to [`RETRY_MAX_ATTEMPTS`] times with exponential backoff
/// (250ms, 500ms, 1s, ...). Returns the first success or the last error.
pub async fn retry_idempotent<T, F, Fut>(op_name: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 1;
    loop {
        match call().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(op = op_name, attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt < RETRY_MAX_ATTEMPTS && is_retryable(&e) => {
                let delay = Duration::from_millis(RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 1));
                warn!(
                    op = op_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying idempotent operation"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
