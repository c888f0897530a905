//! Fixed-delay retry for calls that may hit a sleeping backend

use crate::error::ClientResult;
use foodzippy_core::config::RetryConfig;
use std::future::Future;
use tracing::warn;

/// Run `operation`, retrying only when the backend could not be reached
///
/// `operation` receives the attempt number, starting at 1. API errors and
/// validation errors are returned immediately. After `max_attempts` network
/// failures the last error is returned.
///
/// # Errors
///
/// Returns the first non-network error, or the last network error.
pub async fn with_network_retry<T, F, Fut>(
    policy: &RetryConfig,
    label: &str,
    mut operation: F,
) -> ClientResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Err(err) if err.is_network() && attempt < max_attempts => {
                warn!(
                    operation = label,
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay_ms,
                    error = %err,
                    "Server unreachable, retrying"
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_network_errors_exhaust_attempts() {
        let calls = AtomicU32::new(0);
        let result: ClientResult<()> = with_network_retry(&fast_policy(3), "ping", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ClientError::network("connection refused")) }
        })
        .await;

        assert!(result.unwrap_err().is_network());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_api_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: ClientResult<()> = with_network_retry(&fast_policy(3), "approve", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ClientError::api(503, "Service Unavailable")) }
        })
        .await;

        assert!(matches!(result, Err(ClientError::Api { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_network_failure() {
        let result = with_network_retry(&fast_policy(3), "approve", |attempt| async move {
            if attempt < 2 {
                Err(ClientError::network("timed out"))
            } else {
                Ok(attempt)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let result = with_network_retry(&fast_policy(0), "ping", |attempt| async move {
            Ok::<_, ClientError>(attempt)
        })
        .await;
        assert_eq!(result.unwrap(), 1);
    }
}
